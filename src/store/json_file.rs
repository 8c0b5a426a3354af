use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{PersistenceError, SnapshotStorage, snapshot::Snapshot};

/// Snapshot kept as a single pretty-printed JSON file, rewritten in full on
/// every save. There is no journal, so a crash mid-write can leave a
/// truncated file behind.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStorage for JsonFileStorage {
    fn read(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        debug!(path = %self.path.display(), bytes = contents.len(), "read snapshot");
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| PersistenceError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    fn write(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|source| PersistenceError::Encode { source })?;
        fs::write(&self.path, json).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), accounts = snapshot.accounts.len(), "wrote snapshot");
        Ok(())
    }
}
