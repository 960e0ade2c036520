//! Whole-collection snapshot storage.
//!
//! A collection is always read and written as one JSON array. There are no
//! partial updates and no locking; the single actor that owns a collection is
//! the only writer.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by a snapshot store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PersistenceError {
    #[error("Snapshot I/O error for {collection}: {message}")]
    Io { collection: String, message: String },
    #[error("Snapshot encoding error for {collection}: {message}")]
    Encode { collection: String, message: String },
}

/// Raw byte storage for named snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync + 'static {
    /// Returns the stored bytes, or `None` if the collection was never written.
    async fn read(&self, collection: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Replaces the whole stored snapshot.
    async fn write(&self, collection: &str, bytes: Vec<u8>) -> Result<(), PersistenceError>;
}

/// Loads a collection snapshot.
///
/// A missing snapshot is initialised with `default`, which is written back
/// before returning. An unparseable snapshot is logged and replaced by
/// `default` in memory only; the stored bytes are left alone.
pub async fn load_snapshot<T>(
    store: &dyn SnapshotStore,
    collection: &str,
    default: Vec<T>,
) -> Result<Vec<T>, PersistenceError>
where
    T: Serialize + DeserializeOwned,
{
    match store.read(collection).await? {
        None => {
            debug!(collection, "No snapshot yet, writing default");
            save_snapshot(store, collection, &default).await?;
            Ok(default)
        }
        Some(bytes) => match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(records) => {
                debug!(collection, record_count = records.len(), "Snapshot loaded");
                Ok(records)
            }
            Err(e) => {
                warn!(collection, error = %e, "Snapshot unreadable, falling back to default");
                Ok(default)
            }
        },
    }
}

/// Serializes `records` as pretty JSON and overwrites the stored snapshot.
pub async fn save_snapshot<T>(
    store: &dyn SnapshotStore,
    collection: &str,
    records: &[T],
) -> Result<(), PersistenceError>
where
    T: Serialize,
{
    let bytes = serde_json::to_vec_pretty(records).map_err(|e| PersistenceError::Encode {
        collection: collection.to_string(),
        message: e.to_string(),
    })?;
    store.write(collection, bytes).await
}
