//! In-memory sources.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use bytes::Bytes;

use super::StorageBackend;
use crate::error::{Error, Result};

/// Objects held in memory, keyed by name.
///
/// Serves test fixtures and sources the caller has already read. Insertions
/// after a [`DataStore`](crate::DataStore) has loaded are not seen by it.
///
/// # Example
///
/// ```
/// use cityatlas::backend::{MemoryBackend, StorageBackend};
/// use bytes::Bytes;
///
/// let backend = MemoryBackend::new();
/// backend.insert("codebook.csv", Bytes::from("feature\n"));
/// assert_eq!(backend.get("codebook.csv").unwrap(), Bytes::from("feature\n"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBackend {
    /// An empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `key`, replacing any previous object.
    pub fn insert(&self, key: impl Into<String>, data: Bytes) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), data);
    }

    /// Removes and returns the object under `key`.
    pub fn remove(&self, key: &str) -> Option<Bytes> {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Bytes> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| Error::fetch(key, "no such key in memory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces() {
        let backend = MemoryBackend::new();
        backend.insert("cities.geojson", Bytes::from("old"));
        backend.insert("cities.geojson", Bytes::from("new"));
        assert_eq!(backend.keys(), vec!["cities.geojson"]);
        assert!(matches!(backend.get("cities.geojson"), Ok(b) if b == Bytes::from("new")));
    }

    #[test]
    fn test_missing_key_is_fetch_error() {
        let backend = MemoryBackend::new();
        let err = backend.get("codebook.csv").err();
        assert!(matches!(err, Some(Error::Fetch { ref location, .. }) if location == "codebook.csv"));
    }

    #[test]
    fn test_remove() {
        let backend = MemoryBackend::new();
        backend.insert("b.csv", Bytes::from("x"));
        backend.insert("a.csv", Bytes::from("y"));
        assert_eq!(backend.keys(), vec!["a.csv", "b.csv"]);
        assert_eq!(backend.remove("b.csv"), Some(Bytes::from("x")));
        assert!(backend.get("b.csv").is_err());
        assert_eq!(backend.remove("b.csv"), None);
    }
}
