use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::catalog::FEATURE_COUNT;
use crate::classifier::{
    Classifier, ClassifierError, DecisionTree, KNeighbors, LinearSvc, TreeNodes,
};
use crate::registry::{ModelRegistry, RegistryError};
use crate::scaler::{RobustScaler, ScalerError};

/// Environment variable overriding the artifacts directory.
pub const ARTIFACTS_ENV: &str = "CYTOSCREEN_ARTIFACTS";

/// Optional checksum list, relative to the artifacts directory.
pub const MANIFEST_FILE: &str = "manifest.json";

pub const SCALER_FILE: &str = "robust_scaler.json";

/// Display name and artifact file of each model offered by the form, in display order.
pub const DEFAULT_MODELS: [(&str, &str); 3] = [
    ("SVC (Linear)", "svm_model.json"),
    ("KNN", "knn_model.json"),
    ("Decision Tree", "decision_tree_model.json"),
];

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid model in {file}: {source}")]
    InvalidModel {
        file: String,
        #[source]
        source: ClassifierError,
    },
    #[error("Invalid scaler in {file}: {source}")]
    InvalidScaler {
        file: String,
        #[source]
        source: ScalerError,
    },
    #[error("{file} was fitted on {actual} features, expected {expected}")]
    WidthMismatch {
        file: String,
        expected: usize,
        actual: usize,
    },
    #[error("Checksum manifest not found: {}", .0.display())]
    MissingManifest(PathBuf),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file}")]
    HashMismatch {
        file: String,
        expected: String,
        actual: String,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Serialized parameters of a fitted classifier, tagged by model family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LinearSvc {
        coef: Vec<f64>,
        intercept: f64,
        #[serde(default = "binary_classes")]
        classes: [i64; 2],
    },
    KNeighbors {
        n_neighbors: usize,
        fit_x: Vec<Vec<f64>>,
        fit_y: Vec<i64>,
    },
    DecisionTree {
        n_features: usize,
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        value: Vec<Vec<f64>>,
        #[serde(default = "binary_classes_vec")]
        classes: Vec<i64>,
    },
}

fn binary_classes() -> [i64; 2] {
    [0, 1]
}

fn binary_classes_vec() -> Vec<i64> {
    vec![0, 1]
}

impl ModelArtifact {
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, ClassifierError> {
        let classifier: Arc<dyn Classifier> = match self {
            Self::LinearSvc { coef, intercept, classes } => Arc::new(LinearSvc::new(coef, intercept, classes)?),
            Self::KNeighbors { n_neighbors, fit_x, fit_y } => {
                Arc::new(KNeighbors::new(n_neighbors, fit_x, fit_y)?)
            }
            Self::DecisionTree {
                n_features,
                children_left,
                children_right,
                feature,
                threshold,
                value,
                classes,
            } => Arc::new(DecisionTree::new(
                n_features,
                TreeNodes { children_left, children_right, feature, threshold, value },
                classes,
            )?),
        };
        Ok(classifier)
    }
}

/// Serialized parameters of the fitted input scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    RobustScaler { center: Vec<f64>, scale: Vec<f64> },
}

impl ScalerArtifact {
    pub fn into_scaler(self) -> Result<RobustScaler, ScalerError> {
        match self {
            Self::RobustScaler { center, scale } => RobustScaler::new(center, scale),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// File name to lowercase hex SHA-256 digest.
    pub files: BTreeMap<String, String>,
}

/// Reads fitted scaler and classifier parameters from a directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    /// Creates a store over the default artifacts directory
    pub fn new_default() -> Self {
        Self::new(Self::default_dir())
    }

    /// Returns the default artifacts directory path
    pub fn default_dir() -> PathBuf {
        Self::resolve_dir(env::var(ARTIFACTS_ENV).ok(), env::current_dir().ok())
    }

    fn resolve_dir(env_value: Option<String>, working_dir: Option<PathBuf>) -> PathBuf {
        // 1. Check environment variable
        if let Some(path) = env_value.filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }

        // 2. Fall back to the working directory
        working_dir.unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, ArtifactError> {
        let path = self.path(file);
        if !path.exists() {
            return Err(ArtifactError::NotFound(path));
        }
        let bytes = fs::read(&path)?;
        log::debug!("Read {} bytes from {:?}", bytes.len(), path);
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
            file: file.to_string(),
            source,
        })
    }

    pub fn load_scaler(&self, file: &str) -> Result<RobustScaler, ArtifactError> {
        log::info!("Loading scaler from {:?}", self.path(file));
        let artifact: ScalerArtifact = self.read_json(file)?;
        let scaler = artifact.into_scaler().map_err(|source| ArtifactError::InvalidScaler {
            file: file.to_string(),
            source,
        })?;
        Self::check_width(file, scaler.n_features())?;
        Ok(scaler)
    }

    pub fn load_classifier(&self, file: &str) -> Result<Arc<dyn Classifier>, ArtifactError> {
        log::info!("Loading classifier from {:?}", self.path(file));
        let artifact: ModelArtifact = self.read_json(file)?;
        let classifier = artifact.into_classifier().map_err(|source| ArtifactError::InvalidModel {
            file: file.to_string(),
            source,
        })?;
        Self::check_width(file, classifier.n_features())?;
        log::info!("Loaded {} classifier from {}", classifier.kind(), file);
        Ok(classifier)
    }

    /// Loads each `(display name, file)` pair into a registry, keeping the given order.
    pub fn load_registry(&self, models: &[(&str, &str)]) -> Result<ModelRegistry, ArtifactError> {
        let mut builder = ModelRegistry::builder();
        for (name, file) in models {
            builder = builder.add_model(*name, self.load_classifier(file)?)?;
        }
        Ok(builder.build()?)
    }

    fn check_width(file: &str, actual: usize) -> Result<(), ArtifactError> {
        if actual != FEATURE_COUNT {
            return Err(ArtifactError::WidthMismatch {
                file: file.to_string(),
                expected: FEATURE_COUNT,
                actual,
            });
        }
        Ok(())
    }

    pub fn hash_file(&self, file: &str) -> Result<String, ArtifactError> {
        let path = self.path(file);
        if !path.exists() {
            return Err(ArtifactError::NotFound(path));
        }
        let bytes = fs::read(&path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    pub fn verify_file(&self, file: &str, expected_hash: &str) -> Result<bool, ArtifactError> {
        log::debug!("Verifying file: {:?}", self.path(file));
        let hash = self.hash_file(file)?;
        log::debug!("Calculated hash: {}", hash);
        log::debug!("Expected hash:   {}", expected_hash);
        Ok(hash.eq_ignore_ascii_case(expected_hash))
    }

    pub fn load_manifest(&self) -> Result<Manifest, ArtifactError> {
        let path = self.path(MANIFEST_FILE);
        if !path.exists() {
            return Err(ArtifactError::MissingManifest(path));
        }
        self.read_json(MANIFEST_FILE)
    }

    /// Checks every file listed in the manifest against its recorded digest.
    pub fn verify_all(&self) -> Result<(), ArtifactError> {
        let manifest = self.load_manifest()?;
        log::info!("Verifying {} artifacts against {}", manifest.files.len(), MANIFEST_FILE);
        for (file, expected) in &manifest.files {
            if !self.verify_file(file, expected)? {
                let actual = self.hash_file(file)?;
                log::error!("{} hash mismatch: expected {}, got {}", file, expected, actual);
                return Err(ArtifactError::HashMismatch {
                    file: file.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        log::info!("All artifacts verified successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_artifact_tags() {
        let json = r#"{"kind": "linear_svc", "coef": [1.0, -1.0], "intercept": 0.0}"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        match &artifact {
            ModelArtifact::LinearSvc { classes, .. } => assert_eq!(*classes, [0, 1]),
            other => panic!("unexpected artifact {:?}", other),
        }
        let classifier = artifact.into_classifier().unwrap();
        assert_eq!(classifier.kind(), "linear_svc");
        assert_eq!(classifier.n_features(), 2);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{"kind": "random_forest", "trees": []}"#;
        assert!(serde_json::from_str::<ModelArtifact>(json).is_err());
    }

    #[test]
    fn test_scaler_artifact() {
        let json = r#"{"kind": "robust_scaler", "center": [1.0], "scale": [2.0]}"#;
        let artifact: ScalerArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.into_scaler().unwrap().n_features(), 1);
    }

    #[test]
    fn test_resolve_dir() {
        let cwd = Some(PathBuf::from("/srv/cytoscreen"));
        assert_eq!(
            ArtifactStore::resolve_dir(Some("/tmp/test-cytoscreen".into()), cwd.clone()),
            PathBuf::from("/tmp/test-cytoscreen")
        );
        // an empty variable counts as unset
        assert_eq!(ArtifactStore::resolve_dir(Some(String::new()), cwd.clone()), PathBuf::from("/srv/cytoscreen"));
        assert_eq!(ArtifactStore::resolve_dir(None, cwd), PathBuf::from("/srv/cytoscreen"));
        assert_eq!(ArtifactStore::resolve_dir(None, None), PathBuf::from("."));
    }
}
