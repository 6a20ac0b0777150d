//! In-memory store for tests and headless sessions.

use std::collections::BTreeMap;

use super::{Store, StoreError};

/// Store backed by a map; contents are lost on drop.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blobs: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, json: &str) -> Result<(), StoreError> {
        self.blobs.insert(key.to_string(), json.to_string());
        Ok(())
    }
}
