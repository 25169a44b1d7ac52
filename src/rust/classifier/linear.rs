use ndarray::{Array1, ArrayView1};

use super::error::ClassifierError;
use super::utils::check_width;
use super::Classifier;

/// Binary linear support-vector classifier.
///
/// Decision function: `f(x) = w·x + b`; positive scores map to `classes[1]`.
#[derive(Debug, Clone)]
pub struct LinearSvc {
    coef: Array1<f64>,
    intercept: f64,
    classes: [i64; 2],
}

impl LinearSvc {
    pub fn new(coef: Vec<f64>, intercept: f64, classes: [i64; 2]) -> Result<Self, ClassifierError> {
        if coef.is_empty() {
            return Err(ClassifierError::InvalidModel("coefficient vector is empty".into()));
        }
        if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
            return Err(ClassifierError::InvalidModel("coefficients must be finite".into()));
        }
        Ok(Self {
            coef: Array1::from_vec(coef),
            intercept,
            classes,
        })
    }

    #[inline]
    pub fn decision_function(&self, x: &ArrayView1<f64>) -> f64 {
        self.coef.dot(x) + self.intercept
    }
}

impl Classifier for LinearSvc {
    fn kind(&self) -> &'static str {
        "linear_svc"
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ClassifierError> {
        check_width(&x, self.n_features())?;
        let score = self.decision_function(&x);
        if score.is_nan() {
            return Err(ClassifierError::PredictionError("decision function is NaN".into()));
        }
        Ok(if score > 0.0 { self.classes[1] } else { self.classes[0] })
    }
}
