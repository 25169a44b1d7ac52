//! Classifies breast tumor samples from 30 measurements using pre-fitted models.
//!
//! The fitted scaler and classifiers are loaded once from JSON artifacts and
//! shared read-only by every request.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use cytoscreen::{Diagnosis, Dispatcher, LinearSvc, ModelRegistry, RobustScaler, FEATURE_COUNT};
//!
//! let mut coef = vec![0.0; FEATURE_COUNT];
//! coef[0] = 1.0;
//! let registry = ModelRegistry::builder()
//!     .add_model("SVC (Linear)", Arc::new(LinearSvc::new(coef, -15.0, [0, 1])?))?
//!     .build()?;
//! let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(RobustScaler::identity(FEATURE_COUNT)));
//!
//! let mut raw = vec![Some("1.0"); FEATURE_COUNT];
//! raw[0] = Some("17.99");
//! let result = dispatcher.classify(Some("SVC (Linear)"), &raw)?;
//! assert_eq!(result.diagnosis, Diagnosis::Malignant);
//! # Ok(())
//! # }
//! ```
//!
//! # Loading artifacts
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cytoscreen::ServerConfig;
//!
//! let dispatcher = ServerConfig::default().load_dispatcher()?;
//! println!("models: {:?}", dispatcher.registry().names());
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod registry;
pub mod scaler;
pub mod web;

pub use artifacts::{ArtifactError, ArtifactStore, ModelArtifact, ScalerArtifact, DEFAULT_MODELS, SCALER_FILE};
pub use catalog::{FeatureSpec, FEATURES, FEATURE_COUNT, SAMPLE_DATA};
pub use classifier::{Classifier, ClassifierError, ClassifierInfo, DecisionTree, KNeighbors, LinearSvc};
pub use config::ServerConfig;
pub use dispatch::{Classification, ClassifyError, Diagnosis, Dispatcher, Outcome};
pub use registry::{ModelRegistry, ModelRegistryBuilder, RegistryError};
pub use scaler::{RobustScaler, ScalerError};

/// Initialises `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}
