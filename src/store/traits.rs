//! `PreferenceBackend` trait — the durable half of a preference store.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::store::preferences::Preferences;

/// Backend-agnostic persistence for a whole preference snapshot.
///
/// `save` must be atomic: a concurrent or later `load` sees either the
/// previous snapshot or the new one, never a mix.
#[async_trait]
pub trait PreferenceBackend: Send + Sync {
    /// Short backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Load the persisted snapshot. An empty store loads as defaults.
    async fn load(&self) -> Result<Preferences, StorageError>;

    /// Persist a snapshot, replacing the previous one.
    async fn save(&self, prefs: &Preferences) -> Result<(), StorageError>;
}
