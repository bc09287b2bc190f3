use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stallbook_accounting::Expense;
use stallbook_inventory::{InventoryItem, InventoryTransaction};
use stallbook_sales::Sale;

/// Every persisted collection of the shop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    pub inventory: Vec<InventoryItem>,
    pub inventory_transactions: Vec<InventoryTransaction>,
}

/// Snapshot store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data in {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Whole-state persistence.
///
/// `save` replaces everything previously stored; `load` returns the last
/// saved snapshot (or the initial data set for a fresh store).
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Snapshot, StoreError>;

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + ?Sized,
{
    fn load(&self) -> Result<Snapshot, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }
}

impl<S> SnapshotStore for Box<S>
where
    S: SnapshotStore + ?Sized,
{
    fn load(&self) -> Result<Snapshot, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }
}
