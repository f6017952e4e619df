//! libSQL backend — `PreferenceBackend` over a `preferences` table.
//!
//! Several named stores can share one database file; rows are keyed by
//! `(store, key)` and values are stored as JSON text.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::store::migrations;
use crate::store::preferences::Preferences;
use crate::store::traits::PreferenceBackend;

/// libSQL preference backend.
///
/// Stores a single connection that is reused for all operations.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
    store: String,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path, store: &str) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::unavailable(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StorageError::Query(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db, store).await?;
        info!(path = %path.display(), store, "Preference database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory(store: &str) -> Result<Self, StorageError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                StorageError::Query(format!("Failed to create in-memory database: {e}"))
            })?;
        Self::from_database(db, store).await
    }

    async fn from_database(db: LibSqlDatabase, store: &str) -> Result<Self, StorageError> {
        let conn = db
            .connect()
            .map_err(|e| StorageError::Query(format!("Failed to create connection: {e}")))?;
        migrations::run_migrations(&conn).await?;
        Ok(Self {
            db: Arc::new(db),
            conn,
            store: store.to_string(),
        })
    }

    fn corrupt(&self, key: &str, reason: impl std::fmt::Display) -> StorageError {
        StorageError::Corrupt {
            path: PathBuf::from(format!("preferences/{}/{}", self.store, key)),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl PreferenceBackend for LibSqlBackend {
    fn name(&self) -> &'static str {
        "libsql"
    }

    async fn load(&self) -> Result<Preferences, StorageError> {
        let mut rows = self
            .conn
            .query(
                "SELECT key, value FROM preferences WHERE store = ?1 ORDER BY key",
                params![self.store.as_str()],
            )
            .await
            .map_err(|e| StorageError::Query(format!("load preferences: {e}")))?;

        let mut prefs = Preferences::default();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StorageError::Query(format!("load preferences: {e}")))?
        {
            let key: String = row
                .get(0)
                .map_err(|e| StorageError::Query(format!("read key: {e}")))?;
            let raw: String = row
                .get(1)
                .map_err(|e| StorageError::Query(format!("read value: {e}")))?;
            let value = serde_json::from_str(&raw).map_err(|e| self.corrupt(&key, e))?;
            prefs.insert_raw(key, value);
        }

        debug!(store = %self.store, entries = prefs.len(), "Preferences loaded");
        Ok(prefs)
    }

    async fn save(&self, prefs: &Preferences) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| StorageError::Query(format!("begin save: {e}")))?;

        for (key, value) in prefs.iter() {
            let raw = serde_json::to_string(value)?;
            tx.execute(
                "INSERT INTO preferences (store, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (store, key) DO UPDATE SET value = ?3, updated_at = ?4
                 WHERE preferences.value != ?3",
                params![self.store.as_str(), key, raw, now.as_str()],
            )
            .await
            .map_err(|e| StorageError::Query(format!("save preference {key}: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Query(format!("commit save: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::preferences::PreferenceKey;
    use tempfile::TempDir;

    const FLAG: PreferenceKey<bool> = PreferenceKey::new("onboarding_completed");

    #[tokio::test]
    async fn empty_store_loads_defaults() {
        let backend = LibSqlBackend::new_memory("settings").await.unwrap();
        let prefs = backend.load().await.unwrap();
        assert!(prefs.is_empty());
    }

    #[tokio::test]
    async fn save_then_load() {
        let backend = LibSqlBackend::new_memory("settings").await.unwrap();

        let mut prefs = Preferences::default();
        prefs.set(&FLAG, true);
        backend.save(&prefs).await.unwrap();
        assert_eq!(backend.load().await.unwrap().get(&FLAG), Some(true));

        prefs.set(&FLAG, false);
        backend.save(&prefs).await.unwrap();
        assert_eq!(backend.load().await.unwrap().get(&FLAG), Some(false));
    }

    #[tokio::test]
    async fn stores_are_isolated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.db");

        let a = LibSqlBackend::new_local(&path, "a").await.unwrap();
        let mut prefs = Preferences::default();
        prefs.set(&FLAG, true);
        a.save(&prefs).await.unwrap();

        let b = LibSqlBackend::new_local(&path, "b").await.unwrap();
        assert!(b.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/settings.db");

        {
            let backend = LibSqlBackend::new_local(&path, "settings").await.unwrap();
            let mut prefs = Preferences::default();
            prefs.set(&FLAG, true);
            backend.save(&prefs).await.unwrap();
        }

        let reopened = LibSqlBackend::new_local(&path, "settings").await.unwrap();
        assert_eq!(reopened.load().await.unwrap().get(&FLAG), Some(true));
    }
}
