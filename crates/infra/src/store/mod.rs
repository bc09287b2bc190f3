//! Snapshot persistence boundary.
//!
//! The shop's state is small, so it is stored whole: loaded once at start
//! and written back in full after every committed mutation.

pub mod in_memory;
pub mod json_file;
pub mod seed;
pub mod r#trait;

pub use in_memory::InMemorySnapshotStore;
pub use json_file::JsonFileStore;
pub use r#trait::{Snapshot, SnapshotStore, StoreError};
