//! Validation of submitted measurements and dispatch to the selected model.

use std::fmt;
use std::sync::Arc;

use ndarray::ArrayView1;
use serde::Serialize;

use crate::catalog::{FEATURES, FEATURE_COUNT};
use crate::registry::ModelRegistry;
use crate::scaler::RobustScaler;

/// Predicted nature of the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    /// Maps a binary classifier label; anything but 0 or 1 is rejected.
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            0 => Some(Self::Benign),
            1 => Some(Self::Malignant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Benign => "Benign",
            Self::Malignant => "Malignant",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful classification of one submitted sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub model: String,
    pub values: Vec<f64>,
    pub diagnosis: Diagnosis,
}

/// Reasons a submission could not be classified. The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("Invalid model selection")]
    InvalidModelSelection,
    #[error("Missing value for {feature_name}")]
    MissingFeatureValue { feature_name: String },
    #[error("Invalid value for {feature_name}. Please enter a valid number.")]
    InvalidFeatureValue { feature_name: String, raw_text: String },
    #[error("Incorrect number of features provided.")]
    FeatureCountMismatch { expected: usize, actual: usize },
    #[error("Unrecognized classifier label: {0}")]
    UnrecognizedLabel(i64),
    #[error("An error occurred: {0}")]
    ClassificationFailed(String),
}

pub type Outcome = Result<Classification, ClassifyError>;

/// Holds the process-wide registry and scaler and classifies submissions against them.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ModelRegistry>,
    scaler: Arc<RobustScaler>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Dispatcher>();
    }
};

impl Dispatcher {
    pub fn new(registry: Arc<ModelRegistry>, scaler: Arc<RobustScaler>) -> Self {
        Self { registry, scaler }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn scaler(&self) -> &RobustScaler {
        &self.scaler
    }

    /// Validates the raw form values, scales them and runs the selected model.
    ///
    /// Checks run in order and stop at the first failure: model name, then
    /// each position in catalog order (missing before unparsable at the same
    /// position), then the overall count. Scaling and prediction failures are
    /// reported as [`ClassifyError::ClassificationFailed`]; nothing escapes as
    /// a panic or an untyped error.
    pub fn classify<S: AsRef<str>>(&self, selected_model: Option<&str>, raw_values: &[Option<S>]) -> Outcome {
        let model_name = selected_model.ok_or(ClassifyError::InvalidModelSelection)?;
        let classifier = self
            .registry
            .get(model_name)
            .ok_or(ClassifyError::InvalidModelSelection)?;

        let values = parse_values(raw_values)?;
        if raw_values.len() != FEATURE_COUNT {
            return Err(ClassifyError::FeatureCountMismatch {
                expected: FEATURE_COUNT,
                actual: raw_values.len(),
            });
        }

        let scaled = self
            .scaler
            .transform(ArrayView1::from(&values[..]))
            .map_err(|e| ClassifyError::ClassificationFailed(e.to_string()))?;
        let label = classifier
            .predict(scaled.view())
            .map_err(|e| ClassifyError::ClassificationFailed(e.to_string()))?;
        let diagnosis = Diagnosis::from_label(label).ok_or(ClassifyError::UnrecognizedLabel(label))?;

        log::debug!("{} classified sample as {} (label {})", model_name, diagnosis, label);
        Ok(Classification {
            model: model_name.to_string(),
            values,
            diagnosis,
        })
    }
}

/// Parses the catalog positions of `raw_values`; entries past the catalog are ignored here.
fn parse_values<S: AsRef<str>>(raw_values: &[Option<S>]) -> Result<Vec<f64>, ClassifyError> {
    let mut values = Vec::with_capacity(FEATURE_COUNT);
    for (i, feature) in FEATURES.iter().enumerate() {
        let raw = match raw_values.get(i).and_then(|v| v.as_ref()).map(|v| v.as_ref()) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                return Err(ClassifyError::MissingFeatureValue {
                    feature_name: feature.name.to_string(),
                })
            }
        };
        let value = raw.trim().parse::<f64>().map_err(|_| ClassifyError::InvalidFeatureValue {
            feature_name: feature.name.to_string(),
            raw_text: raw.to_string(),
        })?;
        values.push(value);
    }
    Ok(values)
}
