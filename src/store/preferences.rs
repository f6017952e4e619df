//! Preference snapshot and typed keys.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A typed handle to one entry in a [`Preferences`] snapshot.
pub struct PreferenceKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PreferenceKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for PreferenceKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PreferenceKey<T> {}

impl<T> std::fmt::Debug for PreferenceKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PreferenceKey").field(&self.name).finish()
    }
}

/// An immutable-by-convention snapshot of every entry in a preference store.
///
/// Serialized as a flat JSON object: `{"onboarding_completed": true}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences {
    entries: BTreeMap<String, Value>,
}

impl Preferences {
    /// Read a typed value. A missing entry or one of the wrong type reads as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &PreferenceKey<T>) -> Option<T> {
        self.entries
            .get(key.name())
            .and_then(|v| T::deserialize(v).ok())
    }

    /// Set (overwrite) a typed value.
    pub fn set<T: Into<Value>>(&mut self, key: &PreferenceKey<T>, value: T) {
        self.entries.insert(key.name().to_string(), value.into());
    }

    pub fn contains<T>(&self, key: &PreferenceKey<T>) -> bool {
        self.entries.contains_key(key.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate raw entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert_raw(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }
}
