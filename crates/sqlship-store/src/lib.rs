//! sqlship Store - the SQLite store that gets snapshotted
//!
//! Provides:
//! - Connection management for the `people` store
//! - Idempotent schema creation and atomic batch inserts of synthetic rows
//! - Online, consistent binary snapshots via the SQLite backup API
//! - A logical SQL text dump

pub mod backup;
pub mod db;
pub mod dump;
pub mod errors;
pub mod paths;
pub mod people;
pub mod store;

// Re-export key types
pub use backup::{BackupOptions, SnapshotInfo};
pub use people::{Person, RowGenerator};
pub use store::SnapshotStore;
