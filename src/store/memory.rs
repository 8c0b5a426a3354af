use super::{PersistenceError, SnapshotStorage, snapshot::Snapshot};

/// Keeps the last written snapshot in process memory. Nothing survives a
/// restart.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    snapshot: Option<Snapshot>,
    writes: usize,
}

impl MemoryStorage {
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            writes: 0,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self) -> Result<Option<Snapshot>, PersistenceError> {
        Ok(self.snapshot.clone())
    }

    fn write(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        self.snapshot = Some(snapshot.clone());
        self.writes += 1;
        Ok(())
    }
}
