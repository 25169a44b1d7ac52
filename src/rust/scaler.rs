use ndarray::{Array1, ArrayView1};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScalerError {
    #[error("X has {actual} features, but the scaler is expecting {expected} features as input")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Input contains NaN or infinity at column {0}")]
    NonFinite(usize),
    #[error("Invalid scaler parameters: {0}")]
    InvalidParameters(String),
}

/// Fitted robust scaler: `x' = (x - center) / scale`.
///
/// `center` holds the per-feature medians and `scale` the interquartile
/// ranges of the data the models were fitted on.
#[derive(Debug, Clone)]
pub struct RobustScaler {
    center: Array1<f64>,
    scale: Array1<f64>,
}

impl RobustScaler {
    pub fn new(center: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScalerError> {
        if center.is_empty() {
            return Err(ScalerError::InvalidParameters("center is empty".into()));
        }
        if center.len() != scale.len() {
            return Err(ScalerError::InvalidParameters(format!(
                "center has {} entries but scale has {}",
                center.len(),
                scale.len()
            )));
        }
        if center.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(ScalerError::InvalidParameters("parameters must be finite".into()));
        }
        if let Some(col) = scale.iter().position(|&s| s == 0.0) {
            return Err(ScalerError::InvalidParameters(format!("scale is zero at column {}", col)));
        }
        Ok(Self {
            center: Array1::from_vec(center),
            scale: Array1::from_vec(scale),
        })
    }

    /// Identity transform of the given width.
    pub fn identity(n_features: usize) -> Self {
        Self {
            center: Array1::zeros(n_features),
            scale: Array1::ones(n_features),
        }
    }

    pub fn n_features(&self) -> usize {
        self.center.len()
    }

    pub fn transform(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ScalerError> {
        if x.len() != self.n_features() {
            return Err(ScalerError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.len(),
            });
        }
        if let Some(col) = x.iter().position(|v| !v.is_finite()) {
            return Err(ScalerError::NonFinite(col));
        }
        Ok((&x - &self.center) / &self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_transform() {
        let scaler = RobustScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]).unwrap();
        let out = scaler.transform(array![3.0, 0.0].view()).unwrap();
        assert_eq!(out, array![1.0, -2.0]);
    }

    #[test]
    fn test_identity() {
        let scaler = RobustScaler::identity(3);
        let x = array![1.5, -2.0, 0.25];
        assert_eq!(scaler.transform(x.view()).unwrap(), x);
    }

    #[test]
    fn test_rejects_non_finite_input() {
        let scaler = RobustScaler::identity(2);
        assert_eq!(
            scaler.transform(array![1.0, f64::INFINITY].view()),
            Err(ScalerError::NonFinite(1))
        );
    }

    #[test]
    fn test_rejects_wrong_width() {
        let scaler = RobustScaler::identity(2);
        assert_eq!(
            scaler.transform(array![1.0].view()),
            Err(ScalerError::DimensionMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(RobustScaler::new(vec![], vec![]).is_err());
        assert!(RobustScaler::new(vec![0.0], vec![0.0]).is_err());
        assert!(RobustScaler::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(RobustScaler::new(vec![f64::NAN], vec![1.0]).is_err());
    }
}
