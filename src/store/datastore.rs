//! Preference data store — serialized edits plus a live view of the snapshot.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::store::preferences::Preferences;
use crate::store::traits::PreferenceBackend;

/// Owns a [`PreferenceBackend`] and publishes every successfully persisted
/// snapshot on a single-slot watch channel.
///
/// Edits are read-modify-write and serialized by an async mutex held across
/// the backend save. Subscribers only ever see snapshots that reached the
/// backend; a failed save publishes nothing.
pub struct PreferenceDataStore {
    backend: Arc<dyn PreferenceBackend>,
    edit_lock: Mutex<()>,
    tx: watch::Sender<Preferences>,
}

impl PreferenceDataStore {
    /// Load the persisted snapshot and start publishing it.
    pub async fn open(backend: Arc<dyn PreferenceBackend>) -> Result<Arc<Self>, StorageError> {
        let initial = backend.load().await?;
        debug!(
            backend = backend.name(),
            entries = initial.len(),
            "Preference store opened"
        );
        let (tx, _rx) = watch::channel(initial);
        Ok(Arc::new(Self {
            backend,
            edit_lock: Mutex::new(()),
            tx,
        }))
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Preferences {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.tx.subscribe()
    }

    /// Stream of snapshots: the current one immediately, then one per
    /// successful edit. A lagging subscriber skips straight to the latest.
    pub fn data(&self) -> WatchStream<Preferences> {
        WatchStream::new(self.tx.subscribe())
    }

    /// Apply `transform` to a copy of the current snapshot, persist it, then
    /// publish it. Returns the persisted snapshot.
    pub async fn edit<F>(&self, transform: F) -> Result<Preferences, StorageError>
    where
        F: FnOnce(&mut Preferences) + Send,
    {
        let _guard = self.edit_lock.lock().await;

        let mut next = self.snapshot();
        transform(&mut next);

        if let Err(e) = self.backend.save(&next).await {
            warn!(backend = self.backend.name(), error = %e, "Preference save failed");
            return Err(e);
        }

        self.tx.send_replace(next.clone());
        Ok(next)
    }
}
