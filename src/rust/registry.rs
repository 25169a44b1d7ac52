use std::sync::Arc;

use crate::classifier::{Classifier, ClassifierInfo};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Model name cannot be empty")]
    EmptyName,
    #[error("Model '{0}' is already registered")]
    Duplicate(String),
    #[error("Registry must contain at least one model")]
    Empty,
}

/// Named classifiers offered to the user, in display order.
///
/// Built once at startup and never mutated; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    entries: Vec<(String, Arc<dyn Classifier>)>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<ModelRegistry>();
    }
};

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Classifier>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names in display order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Classifier>)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn info(&self) -> Vec<ClassifierInfo> {
        self.iter()
            .map(|(name, c)| ClassifierInfo {
                name: name.to_string(),
                kind: c.kind(),
                n_features: c.n_features(),
            })
            .collect()
    }
}

/// A builder for constructing a [`ModelRegistry`] with a fluent interface.
#[derive(Debug, Default)]
pub struct ModelRegistryBuilder {
    entries: Vec<(String, Arc<dyn Classifier>)>,
}

impl ModelRegistryBuilder {
    pub fn add_model(
        mut self,
        name: impl Into<String>,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.entries.iter().any(|(n, _)| *n == name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.entries.push((name, classifier));
        Ok(self)
    }

    pub fn build(self) -> Result<ModelRegistry, RegistryError> {
        if self.entries.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(ModelRegistry { entries: self.entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LinearSvc;

    fn svc() -> Arc<dyn Classifier> {
        Arc::new(LinearSvc::new(vec![1.0], 0.0, [0, 1]).unwrap())
    }

    #[test]
    fn test_insertion_order() {
        let registry = ModelRegistry::builder()
            .add_model("b", svc())
            .and_then(|b| b.add_model("a", svc()))
            .and_then(|b| b.add_model("c", svc()))
            .and_then(|b| b.build())
            .unwrap();
        assert_eq!(registry.names(), vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("a"));
        assert!(!registry.contains("d"));
    }

    #[test]
    fn test_duplicate_model() {
        let result = ModelRegistry::builder()
            .add_model("svc", svc())
            .and_then(|b| b.add_model("svc", svc()));
        assert!(matches!(result, Err(RegistryError::Duplicate(name)) if name == "svc"));
    }

    #[test]
    fn test_empty_name_and_registry() {
        assert!(matches!(
            ModelRegistry::builder().add_model("  ", svc()),
            Err(RegistryError::EmptyName)
        ));
        assert!(matches!(ModelRegistry::builder().build(), Err(RegistryError::Empty)));
    }

    #[test]
    fn test_info() {
        let registry = ModelRegistry::builder().add_model("svc", svc()).unwrap().build().unwrap();
        let info = registry.info();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].name, "svc");
        assert_eq!(info[0].kind, "linear_svc");
        assert_eq!(info[0].n_features, 1);
    }
}
