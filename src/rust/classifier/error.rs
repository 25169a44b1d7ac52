use std::fmt;

/// Represents the different types of errors that can occur while running a fitted classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// The input vector does not have the width the model was fitted on
    DimensionMismatch { expected: usize, actual: usize },
    /// The fitted parameters are inconsistent
    InvalidModel(String),
    /// Error occurred while making predictions
    PredictionError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "X has {} features, but the classifier is expecting {} features as input",
                actual, expected
            ),
            Self::InvalidModel(msg) => write!(f, "Invalid model: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}
