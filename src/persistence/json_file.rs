use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{PersistenceError, SnapshotStore};

/// Stores each collection as `<dir>/<collection>.json`.
///
/// Writes overwrite the file in place, so a crash mid-write can leave a
/// truncated snapshot. Loading treats that like any other corrupt snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }
}

fn io_error(collection: &str, e: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        collection: collection.to_string(),
        message: e.to_string(),
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    #[instrument(skip(self))]
    async fn read(&self, collection: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        match tokio::fs::read(self.path_for(collection)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(collection, e)),
        }
    }

    #[instrument(skip(self, bytes), fields(byte_count = bytes.len()))]
    async fn write(&self, collection: &str, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(collection, e))?;
        tokio::fs::write(self.path_for(collection), bytes)
            .await
            .map_err(|e| io_error(collection, e))?;
        debug!("Snapshot written");
        Ok(())
    }
}
