use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{PersistenceError, SnapshotStore};

/// Keeps snapshots in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes of the last write to `collection`.
    pub fn contents(&self, collection: &str) -> Option<Vec<u8>> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .cloned()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn read(&self, collection: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.contents(collection))
    }

    async fn write(&self, collection: &str, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(collection.to_string(), bytes);
        Ok(())
    }
}
