use std::sync::RwLock;

use super::r#trait::{Snapshot, SnapshotStore, StoreError};

/// In-memory snapshot store.
///
/// Intended for tests/dev. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshot: RwLock<Snapshot>,
}

impl InMemorySnapshotStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the initial data set.
    pub fn seeded() -> Self {
        Self::with_snapshot(super::seed::initial_snapshot())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        let snapshot = self.snapshot.read().map_err(|_| StoreError::Poisoned)?;
        Ok(snapshot.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut current = self.snapshot.write().map_err(|_| StoreError::Poisoned)?;
        *current = snapshot.clone();
        Ok(())
    }
}
