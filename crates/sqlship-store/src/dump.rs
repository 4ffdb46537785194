//! Logical SQL dump of the `people` table

use crate::errors::query_error;
use crate::store::SnapshotStore;
use sqlship_core::errors::{Result, ShipError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn quote_opt(value: Option<String>) -> String {
    value.as_deref().map(quote).unwrap_or_else(|| "NULL".to_string())
}

impl SnapshotStore {
    /// Write one `INSERT` statement per row to `path`
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Query` if the table cannot be read and
    /// `ShipError::Io` if the dump file cannot be written.
    pub fn dump_sql(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Dumping database to SQL file");

        let io_err = |e: std::io::Error| ShipError::io("dump_sql", &e);
        let mut out = BufWriter::new(File::create(path).map_err(io_err)?);

        let mut stmt = self
            .conn
            .prepare("SELECT id, first_name, last_name, email, created_at FROM people ORDER BY id")
            .map_err(query_error)?;
        let mut rows = stmt.query([]).map_err(query_error)?;

        let mut written = 0usize;
        while let Some(row) = rows.next().map_err(query_error)? {
            let id: i64 = row.get(0).map_err(query_error)?;
            let values = [
                quote_opt(row.get(1).map_err(query_error)?),
                quote_opt(row.get(2).map_err(query_error)?),
                quote_opt(row.get(3).map_err(query_error)?),
                quote_opt(row.get(4).map_err(query_error)?),
            ];
            writeln!(
                out,
                "INSERT INTO people (id, first_name, last_name, email, created_at) VALUES ({}, {});",
                id,
                values.join(", ")
            )
            .map_err(io_err)?;
            written += 1;
        }
        out.flush().map_err(io_err)?;

        tracing::info!(rows = written, "Dumped rows to file");
        Ok(written)
    }
}
