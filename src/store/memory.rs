//! In-memory preference backend for tests and ephemeral runs.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::store::preferences::Preferences;
use crate::store::traits::PreferenceBackend;

/// Keeps the snapshot in process memory. Can simulate an outage or a slow disk.
#[derive(Default)]
pub struct MemoryBackend {
    prefs: RwLock<Preferences>,
    failing: AtomicBool,
    save_delay: Option<Duration>,
    saves: AtomicUsize,
    failed_saves: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot.
    pub fn with_preferences(prefs: Preferences) -> Self {
        Self {
            prefs: RwLock::new(prefs),
            ..Self::default()
        }
    }

    /// Delay every save by `delay` before it takes effect.
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    /// Make subsequent loads and saves fail with `StorageError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of saves rejected by a simulated outage.
    pub fn failed_save_count(&self) -> usize {
        self.failed_saves.load(Ordering::SeqCst)
    }

    /// The snapshot as last persisted.
    pub async fn stored(&self) -> Preferences {
        self.prefs.read().await.clone()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(
                "<memory>",
                std::io::Error::other("simulated storage outage"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PreferenceBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> Result<Preferences, StorageError> {
        self.check_available()?;
        Ok(self.prefs.read().await.clone())
    }

    async fn save(&self, prefs: &Preferences) -> Result<(), StorageError> {
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }
        if let Err(e) = self.check_available() {
            self.failed_saves.fetch_add(1, Ordering::SeqCst);
            return Err(e);
        }
        *self.prefs.write().await = prefs.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
