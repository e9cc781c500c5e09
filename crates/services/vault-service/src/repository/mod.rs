//! Repository layer for data access.

mod memory_store;

pub use memory_store::{InMemoryPasswordEntryStore, SnapshotLock, StoredRecord};
