//! Store configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::{JsonStore, MemoryStore, Result, Store};

/// Which storage backend to run on. Chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Purely in-memory; state dies with the process.
    Memory,

    /// JSON files under a data directory, rewritten after every mutation.
    Json {
        /// Directory holding the collection and counter files.
        data_dir: PathBuf,
    },
}

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// The selected backend.
    pub backend: StorageBackend,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// `KHATA_STORE` selects the backend (`"memory"` or `"json"`, default
    /// `"json"`); `KHATA_DATA_DIR` sets the data directory (default
    /// `"data/khata"`).
    #[must_use]
    pub fn from_env() -> Self {
        let backend = match std::env::var("KHATA_STORE").as_deref() {
            Ok("memory") => StorageBackend::Memory,
            _ => StorageBackend::Json {
                data_dir: std::env::var("KHATA_DATA_DIR")
                    .unwrap_or_else(|_| "data/khata".into())
                    .into(),
            },
        };
        Self { backend }
    }

    /// Open the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON store's data directory cannot be created.
    pub fn open(&self) -> Result<Arc<dyn Store>> {
        match &self.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StorageBackend::Json { data_dir } => {
                let store = JsonStore::open(data_dir)?;
                Ok(Arc::new(store))
            }
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json {
                data_dir: "data/khata".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_opens() {
        let config = StoreConfig {
            backend: StorageBackend::Memory,
        };
        let store = config.open().unwrap();
        assert!(store.list_parties().unwrap().is_empty());
    }

    #[test]
    fn default_backend_is_json() {
        assert!(matches!(
            StoreConfig::default().backend,
            StorageBackend::Json { .. }
        ));
    }
}
