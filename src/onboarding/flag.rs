//! The persisted "onboarding completed" flag.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tracing::info;

use crate::error::StorageError;
use crate::store::{PreferenceDataStore, PreferenceKey, Preferences};

/// Preference key holding the flag. Absent means `false`.
pub const ONBOARDING_COMPLETED: PreferenceKey<bool> = PreferenceKey::new("onboarding_completed");

/// Observable, writable view of [`ONBOARDING_COMPLETED`].
///
/// Cheap to clone; every clone shares the same store.
#[derive(Clone)]
pub struct OnboardingFlag {
    store: Arc<PreferenceDataStore>,
}

impl OnboardingFlag {
    pub fn new(store: Arc<PreferenceDataStore>) -> Self {
        Self { store }
    }

    /// Persist the flag. Observers see the new value only once the save succeeded.
    pub async fn write(&self, completed: bool) -> Result<(), StorageError> {
        self.store
            .edit(|prefs| prefs.set(&ONBOARDING_COMPLETED, completed))
            .await?;
        info!(completed, "Onboarding flag saved");
        Ok(())
    }

    /// The current value immediately, then one value per successful write.
    pub fn observe(&self) -> impl Stream<Item = bool> + Send + Unpin + use<> {
        self.store.data().map(|prefs| read_flag(&prefs))
    }

    /// The latest persisted value.
    pub fn current(&self) -> bool {
        read_flag(&self.store.snapshot())
    }
}

fn read_flag(prefs: &Preferences) -> bool {
    prefs.get(&ONBOARDING_COMPLETED).unwrap_or(false)
}
