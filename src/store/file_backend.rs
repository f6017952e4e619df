//! File-backed preference store.
//!
//! The whole snapshot lives in one JSON document. Saves go to a sibling
//! `.tmp` file which is fsynced and then renamed over the document, so a
//! reader never sees a half-written file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::store::preferences::Preferences;
use crate::store::traits::PreferenceBackend;

pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend for the document at `path`. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write `contents` to `tmp`, fsync it, then rename it over the document.
    async fn replace_with(&self, tmp: &Path, contents: &[u8]) -> Result<(), StorageError> {
        let mut file = fs::File::create(tmp)
            .await
            .map_err(|e| StorageError::unavailable(tmp, e))?;
        file.write_all(contents)
            .await
            .map_err(|e| StorageError::unavailable(tmp, e))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::unavailable(tmp, e))?;
        drop(file);

        fs::rename(tmp, &self.path)
            .await
            .map_err(|e| StorageError::unavailable(&self.path, e))
    }

    async fn ensure_parent_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::unavailable(parent, e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl PreferenceBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn load(&self) -> Result<Preferences, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No preference file yet, using defaults");
                return Ok(Preferences::default());
            }
            Err(e) => return Err(StorageError::unavailable(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(Preferences::default());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    async fn save(&self, prefs: &Preferences) -> Result<(), StorageError> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(prefs)?;
        let tmp = self.temp_path();

        if let Err(e) = self.replace_with(&tmp, json.as_bytes()).await {
            match fs::remove_file(&tmp).await {
                Err(cleanup) if cleanup.kind() != ErrorKind::NotFound => {
                    warn!(path = %tmp.display(), error = %cleanup, "Could not remove temp file");
                }
                _ => {}
            }
            return Err(e);
        }

        debug!(path = %self.path.display(), entries = prefs.len(), "Preferences saved");
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
    async fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("missing.json"));
        let prefs = backend.load().await.unwrap();
        assert!(prefs.is_empty());
    }

    #[tokio::test]
    async fn empty_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "  \n").await.unwrap();

        let prefs = FileBackend::new(path).load().await.unwrap();
        assert!(prefs.is_empty());
    }

    #[tokio::test]
    async fn invalid_json_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{invalid json").await.unwrap();

        let err = FileBackend::new(path).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn non_object_document_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("array.json");
        fs::write(&path, "[true]").await.unwrap();

        let err = FileBackend::new(path).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn save_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.preferences.json");

        let mut prefs = Preferences::default();
        prefs.set(&FLAG, true);
        FileBackend::new(&path).save(&prefs).await.unwrap();

        let reopened = FileBackend::new(&path).load().await.unwrap();
        assert_eq!(reopened.get(&FLAG), Some(true));

        let on_disk = fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(value, serde_json::json!({"onboarding_completed": true}));
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("settings.preferences.json"));
        backend.save(&Preferences::default()).await.unwrap();

        assert!(!backend.temp_path().exists());
        assert!(backend.path().exists());
    }

    #[tokio::test]
    async fn save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("a/b/settings.preferences.json"));
        backend.save(&Preferences::default()).await.unwrap();
        assert!(backend.path().exists());
    }

    #[tokio::test]
    async fn unwritable_location_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").await.unwrap();

        let backend = FileBackend::new(blocker.join("settings.preferences.json"));
        let err = backend.save(&Preferences::default()).await.unwrap_err();
        assert!(err.is_unavailable(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory at the document path makes the rename fail
        // after the temp file has been written.
        let path = dir.path().join("settings.preferences.json");
        fs::create_dir(&path).await.unwrap();
        fs::write(path.join("occupant"), "x").await.unwrap();

        let backend = FileBackend::new(&path);
        let err = backend.save(&Preferences::default()).await.unwrap_err();
        assert!(err.is_unavailable(), "unexpected error: {err}");
        assert!(!backend.temp_path().exists());
    }

    #[test]
    fn temp_path_is_sibling() {
        let backend = FileBackend::new("/data/settings.preferences.json");
        assert_eq!(
            backend.temp_path(),
            PathBuf::from("/data/settings.preferences.json.tmp")
        );
    }
}
