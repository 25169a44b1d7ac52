//! Fitted classifiers behind a single prediction capability.
//!
//! Every model family exposes the same [`Classifier`] trait so callers never
//! look at the concrete type. Models are inference-only: parameters come
//! from estimators fitted elsewhere and are loaded by [`crate::artifacts`].

mod error;
mod knn;
mod linear;
mod tree;
pub(crate) mod utils;

use std::fmt::Debug;

use ndarray::ArrayView1;
use serde::Serialize;

pub use error::ClassifierError;
pub use knn::KNeighbors;
pub use linear::LinearSvc;
pub use tree::{DecisionTree, TreeNodes, TREE_LEAF};

/// A fitted model mapping a scaled feature vector to a class label.
///
/// Implementations must be safe to call concurrently; the registry shares one
/// instance across every request.
pub trait Classifier: Send + Sync + Debug {
    /// Short identifier of the model family, e.g. `"linear_svc"`.
    fn kind(&self) -> &'static str;

    /// Width of the input vectors the model was fitted on.
    fn n_features(&self) -> usize;

    /// Predicts the class label of a single sample.
    fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ClassifierError>;
}

/// Describes a registered classifier for listing purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifierInfo {
    pub name: String,
    pub kind: &'static str,
    pub n_features: usize,
}
