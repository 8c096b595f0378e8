//! Caller-defined navigation context
//!
//! Typical entries are the active sort key or filter values, so a view can
//! restore them when it comes back to a paginator.

use crate::types::{JsonValue, ValueMap};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Key/value store attached to a paginator
///
/// Cloning yields a handle to the same store. Its lifecycle is independent
/// of the page cache: clearing the cache leaves metadata alone.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    entries: Arc<Mutex<ValueMap>>,
}

impl Metadata {
    /// Create an empty metadata store
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, ValueMap> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a value
    pub fn get(&self, key: &str) -> Option<JsonValue> {
        self.entries().get(key).cloned()
    }

    /// Get a value deserialized into `T`
    ///
    /// Returns `None` when the key is absent or holds a different shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| serde_json::from_value(value).ok())
    }

    /// Set a value, returning the previous one
    pub fn set(&self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.entries().insert(key.into(), value.into())
    }

    /// Serialize and set a value
    pub fn set_as<T: Serialize>(&self, key: impl Into<String>, value: &T) -> crate::Result<()> {
        let value = serde_json::to_value(value)?;
        self.entries().insert(key.into(), value);
        Ok(())
    }

    /// Remove a value
    pub fn remove(&self, key: &str) -> Option<JsonValue> {
        self.entries().remove(key)
    }

    /// Check if a key is set
    pub fn contains(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    /// Remove every value
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Copy of all entries
    pub fn snapshot(&self) -> ValueMap {
        self.entries().clone()
    }
}
