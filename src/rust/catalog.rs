//! The fixed feature schema shared by the form, the scaler and every model.
//!
//! Order matters: position `i` in [`FEATURES`] is form field `feature_i` and
//! column `i` of the matrices the scaler and the classifiers were fitted on.

use serde::Serialize;

/// Number of measurements in a feature vector.
pub const FEATURE_COUNT: usize = 30;

/// A single named measurement with a human-readable description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub description: &'static str,
}

impl FeatureSpec {
    const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }
}

pub static FEATURES: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec::new("radius_mean", "Mean of distances from center to points on the perimeter"),
    FeatureSpec::new("texture_mean", "Standard deviation of gray-scale values"),
    FeatureSpec::new("perimeter_mean", "Mean size of the core tumor"),
    FeatureSpec::new("area_mean", "Mean area of the tumor"),
    FeatureSpec::new("smoothness_mean", "Mean of local variation in radius lengths"),
    FeatureSpec::new("compactness_mean", "Mean of perimeter^2 / area - 1.0"),
    FeatureSpec::new("concavity_mean", "Mean of severity of concave portions of the contour"),
    FeatureSpec::new("concave points_mean", "Mean for number of concave portions of the contour"),
    FeatureSpec::new("symmetry_mean", "Mean of symmetry of the tumor"),
    FeatureSpec::new("fractal_dimension_mean", "Mean for \"coastline approximation\" - 1"),
    FeatureSpec::new("radius_se", "Standard error for the mean of distances from center to points"),
    FeatureSpec::new("texture_se", "Standard error for texture"),
    FeatureSpec::new("perimeter_se", "Standard error for perimeter"),
    FeatureSpec::new("area_se", "Standard error for area"),
    FeatureSpec::new("smoothness_se", "Standard error for smoothness"),
    FeatureSpec::new("compactness_se", "Standard error for compactness"),
    FeatureSpec::new("concavity_se", "Standard error for concavity"),
    FeatureSpec::new("concave points_se", "Standard error for concave points"),
    FeatureSpec::new("symmetry_se", "Standard error for symmetry"),
    FeatureSpec::new("fractal_dimension_se", "Standard error for fractal dimension"),
    FeatureSpec::new("radius_worst", "Worst or largest mean value for radius"),
    FeatureSpec::new("texture_worst", "Worst or largest mean value for texture"),
    FeatureSpec::new("perimeter_worst", "Worst or largest mean value for perimeter"),
    FeatureSpec::new("area_worst", "Worst or largest mean value for area"),
    FeatureSpec::new("smoothness_worst", "Worst or largest mean value for smoothness"),
    FeatureSpec::new("compactness_worst", "Worst or largest mean value for compactness"),
    FeatureSpec::new("concavity_worst", "Worst or largest mean value for concavity"),
    FeatureSpec::new("concave points_worst", "Worst or largest mean value for concave points"),
    FeatureSpec::new("symmetry_worst", "Worst or largest mean value for symmetry"),
    FeatureSpec::new("fractal_dimension_worst", "Worst or largest mean value for fractal dimension"),
];

/// Illustrative measurements used to pre-fill the form.
pub static SAMPLE_DATA: [f64; FEATURE_COUNT] = [
    17.99, 10.38, 122.8, 1001.0, 0.11840, 0.27760, 0.30010, 0.14710, 0.2419, 0.07871,
    1.095, 0.9053, 8.589, 153.4, 0.006399, 0.04904, 0.05373, 0.01587, 0.03003, 0.006193,
    25.38, 17.33, 184.6, 2019.0, 0.1622, 0.6656, 0.7119, 0.2654, 0.4601, 0.1189,
];

/// Returns the feature at `index`, if any.
pub fn feature(index: usize) -> Option<&'static FeatureSpec> {
    FEATURES.get(index)
}

/// Returns the column index of the feature called `name`.
pub fn position(name: &str) -> Option<usize> {
    FEATURES.iter().position(|f| f.name == name)
}

/// Form field name for the feature at `index`.
pub fn field_name(index: usize) -> String {
    format!("feature_{}", index)
}
