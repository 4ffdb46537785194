//! The `people` store
//!
//! `SnapshotStore` owns one SQLite connection. Writes happen in a single
//! transaction per batch so a failed batch is never partially visible.

use crate::db;
use crate::errors::{query_error, schema_error, write_error};
use crate::paths;
use crate::people::RowGenerator;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use sqlship_core::errors::Result;
use sqlship_core::{log_op_end, log_op_error, log_op_start};
use std::path::{Path, PathBuf};
use std::time::Instant;

const CREATE_PEOPLE: &str = r#"
CREATE TABLE IF NOT EXISTS people (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT,
    last_name TEXT,
    email TEXT,
    created_at TEXT
);
"#;

const INSERT_PERSON: &str =
    "INSERT INTO people (first_name, last_name, email, created_at) VALUES (?1, ?2, ?3, ?4)";

/// Relational store of `people` rows that can snapshot itself
pub struct SnapshotStore {
    pub(crate) conn: Connection,
    path: Option<PathBuf>,
}

impl SnapshotStore {
    /// Open (or create) the store file at `path`
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Io` if SQLite cannot open or configure the file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Opening SQLite database");
        let conn = db::open(path)?;
        db::configure(&conn)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open the store file for a run started at `now`,
    /// `<prefix>_<YYYY-MM-DD_HH-MM-SS>.sqlite`
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Io` if SQLite cannot open or configure the file.
    pub fn open_timestamped(prefix: impl AsRef<Path>, now: DateTime<Local>) -> Result<Self> {
        Self::open(paths::store_path(prefix.as_ref(), now))
    }

    /// Open a private in-memory store
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Io` if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: db::open_in_memory()?,
            path: None,
        })
    }

    /// File backing the store, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the `people` table if it does not exist
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Schema` if the engine rejects the DDL.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(CREATE_PEOPLE).map_err(schema_error)?;
        tracing::info!("Table 'people' ready");
        Ok(())
    }

    /// Insert `count` synthetic rows in one transaction
    ///
    /// Rows come from a generator seeded from `SQLSHIP_SEED` when set.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Write`; the whole batch is rolled back.
    pub fn insert_rows(&mut self, count: u32) -> Result<u32> {
        let mut generator = RowGenerator::from_env();
        self.insert_with(count, &mut generator)
    }

    /// Insert `count` rows drawn from `generator` in one transaction
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Write`; the whole batch is rolled back.
    pub fn insert_with(&mut self, count: u32, generator: &mut RowGenerator) -> Result<u32> {
        log_op_start!("insert_rows", rows = count);
        let started = Instant::now();

        match self.insert_batch(count, generator) {
            Ok(inserted) => {
                log_op_end!(
                    "insert_rows",
                    duration_ms = started.elapsed().as_millis() as u64,
                    rows = inserted
                );
                Ok(inserted)
            }
            Err(err) => {
                tracing::error!("Transaction rolled back due to error during insert_rows");
                log_op_error!(
                    "insert_rows",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }

    fn insert_batch(&mut self, count: u32, generator: &mut RowGenerator) -> Result<u32> {
        // Dropping an uncommitted transaction rolls it back
        let tx = self.conn.transaction().map_err(write_error)?;
        {
            let mut stmt = tx.prepare(INSERT_PERSON).map_err(write_error)?;
            for i in 0..count {
                let person = generator.next_person();
                stmt.execute(params![
                    person.first_name,
                    person.last_name,
                    person.email,
                    person.created_at
                ])
                .map_err(|e| sqlship_core::ShipError::Write {
                    reason: format!("insert failed at row {}: {}", i, e),
                })?;
            }
        }
        tx.commit().map_err(write_error)?;
        Ok(count)
    }

    /// Number of rows currently in `people`
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Query` on engine-level failure, never for zero rows.
    pub fn row_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))
            .map_err(query_error)?;
        tracing::info!(rows = count, "Current row count");
        Ok(count as u64)
    }
}

impl Drop for SnapshotStore {
    fn drop(&mut self) {
        match &self.path {
            Some(path) => tracing::info!(path = %path.display(), "SQLite database closed"),
            None => tracing::debug!("In-memory SQLite database closed"),
        }
    }
}
