use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::artifacts::{ArtifactError, ArtifactStore, DEFAULT_MODELS, SCALER_FILE};
use crate::dispatch::Dispatcher;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub artifacts_dir: PathBuf,
    /// Check artifact digests against `manifest.json` before loading anything
    pub verify_checksums: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            artifacts_dir: ArtifactStore::default_dir(),
            verify_checksums: false,
        }
    }
}

impl ServerConfig {
    pub fn store(&self) -> ArtifactStore {
        ArtifactStore::new(&self.artifacts_dir)
    }

    /// Loads the scaler and the default models. Any missing or invalid artifact is fatal.
    pub fn load_dispatcher(&self) -> Result<Dispatcher, ArtifactError> {
        let store = self.store();
        if self.verify_checksums {
            store.verify_all()?;
        }
        let scaler = store.load_scaler(SCALER_FILE)?;
        let registry = store.load_registry(&DEFAULT_MODELS)?;
        log::info!(
            "Loaded {} models from {:?}: {}",
            registry.len(),
            store.dir(),
            registry.names().join(", ")
        );
        Ok(Dispatcher::new(Arc::new(registry), Arc::new(scaler)))
    }
}
