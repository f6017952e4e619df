//! Persistence layer — preference snapshots, backends, and the live data store.

pub mod datastore;
pub mod file_backend;
pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod preferences;
pub mod traits;

use std::sync::Arc;

pub use datastore::PreferenceDataStore;
pub use file_backend::FileBackend;
pub use libsql_backend::LibSqlBackend;
pub use memory::MemoryBackend;
pub use preferences::{PreferenceKey, Preferences};
pub use traits::PreferenceBackend;

use crate::config::{AppConfig, StoreBackend};
use crate::error::{self, StorageError};

/// Build the backend selected by `config`.
pub async fn open_backend(config: &AppConfig) -> Result<Arc<dyn PreferenceBackend>, StorageError> {
    let backend: Arc<dyn PreferenceBackend> = match config.backend {
        StoreBackend::File => Arc::new(FileBackend::new(config.preferences_file())),
        StoreBackend::Sqlite => Arc::new(
            LibSqlBackend::new_local(&config.database_file(), &config.store_name).await?,
        ),
    };
    Ok(backend)
}

/// Open the configured backend and load its snapshot into a live store.
pub async fn open_store(config: &AppConfig) -> error::Result<Arc<PreferenceDataStore>> {
    let backend = open_backend(config).await?;
    Ok(PreferenceDataStore::open(backend).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, backend: StoreBackend) -> AppConfig {
        AppConfig {
            data_dir: dir.path().to_path_buf(),
            backend,
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn open_store_starts_empty() {
        let dir = TempDir::new().unwrap();
        for backend in [StoreBackend::File, StoreBackend::Sqlite] {
            let store = open_store(&config_in(&dir, backend)).await.unwrap();
            assert!(store.snapshot().is_empty());
        }
    }

    #[tokio::test]
    async fn corrupt_document_fails_to_open() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, StoreBackend::File);
        tokio::fs::write(config.preferences_file(), "{not json")
            .await
            .unwrap();

        let err = open_store(&config).await.err().unwrap();
        assert!(
            matches!(err, Error::Storage(StorageError::Corrupt { .. })),
            "unexpected error: {err}"
        );
    }
}
