use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::r#trait::{Snapshot, SnapshotStore, StoreError};
use super::seed;

pub const SALES_FILE: &str = "sales.json";
pub const EXPENSES_FILE: &str = "expenses.json";
pub const INVENTORY_FILE: &str = "inventory.json";
pub const TRANSACTIONS_FILE: &str = "inventoryTransactions.json";

/// Snapshot store backed by one pretty-printed JSON array per collection.
///
/// A missing data directory is created, and a missing file is written with
/// the initial data for its collection. `save` writes every collection to a
/// temporary sibling first and renames them into place only once all four
/// writes succeeded, so a failed write leaves every file as it was.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    // Serialises writers sharing this store.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))
    }

    fn read_or_seed<T>(&self, file: &str, seed: impl FnOnce() -> Vec<T>) -> Result<Vec<T>, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = self.dir.join(file);
        match fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StoreError::Parse { path, source })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let records = seed();
                self.write(file, &records)?;
                tracing::info!(file = %path.display(), records = records.len(), "seeded data file");
                Ok(records)
            }
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn tmp_path(&self, file: &str) -> PathBuf {
        self.dir.join(format!("{file}.tmp"))
    }

    fn write<T: Serialize>(&self, file: &str, records: &[T]) -> Result<(), StoreError> {
        let path = self.dir.join(file);
        let tmp = self.tmp_path(file);
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.ensure_dir()?;

        Ok(Snapshot {
            sales: self.read_or_seed(SALES_FILE, seed::sales)?,
            expenses: self.read_or_seed(EXPENSES_FILE, seed::expenses)?,
            inventory: self.read_or_seed(INVENTORY_FILE, seed::inventory)?,
            inventory_transactions: self
                .read_or_seed(TRANSACTIONS_FILE, seed::inventory_transactions)?,
        })
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.ensure_dir()?;

        let staged = [
            (SALES_FILE, serde_json::to_string_pretty(&snapshot.sales)?),
            (EXPENSES_FILE, serde_json::to_string_pretty(&snapshot.expenses)?),
            (INVENTORY_FILE, serde_json::to_string_pretty(&snapshot.inventory)?),
            (
                TRANSACTIONS_FILE,
                serde_json::to_string_pretty(&snapshot.inventory_transactions)?,
            ),
        ];

        for (i, (file, json)) in staged.iter().enumerate() {
            let tmp = self.tmp_path(file);
            if let Err(e) = fs::write(&tmp, json) {
                for (written, _) in &staged[..i] {
                    let _ = fs::remove_file(self.tmp_path(written));
                }
                tracing::warn!(file = %tmp.display(), error = %e, "staging write failed; data files untouched");
                return Err(StoreError::io(tmp, e));
            }
        }

        for (file, _) in &staged {
            let path = self.dir.join(file);
            fs::rename(self.tmp_path(file), &path).map_err(|e| StoreError::io(path, e))?;
        }

        tracing::debug!(dir = %self.dir.display(), "snapshot written");
        Ok(())
    }
}
