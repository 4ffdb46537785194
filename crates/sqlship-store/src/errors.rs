//! Error helpers for sqlship-store
//!
//! Map `rusqlite::Error` into the store side of the `ShipError` taxonomy.

use sqlship_core::errors::ShipError;
use std::path::Path;

/// The engine rejected DDL
pub fn schema_error(err: rusqlite::Error) -> ShipError {
    ShipError::Schema {
        reason: err.to_string(),
    }
}

/// A write or its surrounding transaction failed
pub fn write_error(err: rusqlite::Error) -> ShipError {
    ShipError::Write {
        reason: err.to_string(),
    }
}

/// A read query failed at engine level
pub fn query_error(err: rusqlite::Error) -> ShipError {
    ShipError::Query {
        reason: err.to_string(),
    }
}

/// The backup to `path` did not complete cleanly
pub fn backup_error(path: &Path, reason: impl Into<String>) -> ShipError {
    ShipError::Backup {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}
