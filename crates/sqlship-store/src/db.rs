//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use sqlship_core::errors::{Result, ShipError};
use rusqlite::Connection;
use std::path::Path;

fn open_error(path: &Path, err: rusqlite::Error) -> ShipError {
    ShipError::Io {
        op: "open_store".to_string(),
        reason: format!("can't open SQLite database {}: {}", path.display(), err),
    }
}

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    Connection::open(path).map_err(|e| open_error(path, e))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|e| open_error(Path::new(":memory:"), e))
}

/// Configure a file-backed connection
///
/// WAL lets readers (including the backup) proceed while another
/// connection writes.
pub fn configure(conn: &Connection) -> Result<()> {
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(|e| ShipError::Io {
            op: "configure_store".to_string(),
            reason: e.to_string(),
        })?;
    tracing::debug!(journal_mode = %mode, "Configured store connection");
    Ok(())
}
