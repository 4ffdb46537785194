//! Consistent binary snapshots
//!
//! Uses the SQLite online backup API: pages are copied in steps, and a step
//! that finds the source or destination busy/locked is retried after a short
//! pause instead of failing. Only a backup that reaches `Done` (and passes a
//! quick integrity check) is reported as a snapshot.

use crate::errors::backup_error;
use crate::store::SnapshotStore;
use chrono::{DateTime, Utc};
use rusqlite::backup::{Backup, StepResult};
use rusqlite::Connection;
use serde::Serialize;
use sqlship_core::errors::Result;
use sqlship_core::{log_op_end, log_op_error, log_op_start};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Tuning for the stepped copy
#[derive(Debug, Clone)]
pub struct BackupOptions {
    /// Pages copied per step
    pub pages_per_step: i32,
    /// Pause after a busy/locked step
    pub busy_pause: Duration,
    /// Consecutive busy/locked steps tolerated before giving up
    pub max_busy_retries: u32,
    /// Run `PRAGMA quick_check` on the finished copy
    pub verify: bool,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            pages_per_step: 1024,
            busy_pause: Duration::from_millis(50),
            max_busy_retries: 600,
            verify: true,
        }
    }
}

/// A finished snapshot on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotInfo {
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

impl SnapshotStore {
    /// Copy the whole store to `dest` with default options
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Backup`; `dest` may then hold a partial file that
    /// the caller must delete.
    pub fn backup(&self, dest: impl AsRef<Path>) -> Result<SnapshotInfo> {
        self.backup_with(dest, &BackupOptions::default())
    }

    /// Copy the whole store to `dest`
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Backup`; `dest` may then hold a partial file that
    /// the caller must delete.
    pub fn backup_with(
        &self,
        dest: impl AsRef<Path>,
        options: &BackupOptions,
    ) -> Result<SnapshotInfo> {
        let dest = dest.as_ref();
        log_op_start!("backup", path = %dest.display());
        let started = Instant::now();

        match copy_database(&self.conn, dest, options) {
            Ok(info) => {
                log_op_end!(
                    "backup",
                    duration_ms = started.elapsed().as_millis() as u64,
                    size_bytes = info.size_bytes
                );
                Ok(info)
            }
            Err(err) => {
                log_op_error!(
                    "backup",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }
}

fn copy_database(src: &Connection, dest: &Path, options: &BackupOptions) -> Result<SnapshotInfo> {
    let mut dst = Connection::open(dest)
        .map_err(|e| backup_error(dest, format!("failed to open destination DB: {}", e)))?;
    // Busy handling is done by the step loop, not by SQLite's busy handler
    dst.busy_timeout(Duration::ZERO)
        .map_err(|e| backup_error(dest, e.to_string()))?;

    {
        let backup = Backup::new(src, &mut dst)
            .map_err(|e| backup_error(dest, format!("backup init failed: {}", e)))?;
        let mut busy_streak = 0u32;

        loop {
            let step = backup
                .step(options.pages_per_step)
                .map_err(|e| backup_error(dest, format!("backup step failed: {}", e)))?;
            match step {
                StepResult::Done => break,
                StepResult::More => {
                    busy_streak = 0;
                    let progress = backup.progress();
                    tracing::debug!(
                        remaining = progress.remaining,
                        pagecount = progress.pagecount,
                        "Backup step copied"
                    );
                }
                StepResult::Busy | StepResult::Locked => {
                    busy_streak += 1;
                    if busy_streak > options.max_busy_retries {
                        return Err(backup_error(
                            dest,
                            format!(
                                "store still busy/locked after {} retries",
                                options.max_busy_retries
                            ),
                        ));
                    }
                    tracing::debug!(busy_streak, "Store busy/locked during backup, retrying");
                    thread::sleep(options.busy_pause);
                }
                #[allow(unreachable_patterns)]
                other => {
                    return Err(backup_error(
                        dest,
                        format!("unexpected backup step result: {:?}", other),
                    ))
                }
            }
        }
    }

    if options.verify {
        let verdict: String = dst
            .query_row("PRAGMA quick_check", [], |row| row.get(0))
            .map_err(|e| backup_error(dest, format!("integrity check failed: {}", e)))?;
        if verdict != "ok" {
            return Err(backup_error(
                dest,
                format!("integrity check reported: {}", verdict),
            ));
        }
    }

    dst.close()
        .map_err(|(_, e)| backup_error(dest, format!("failed to close destination: {}", e)))?;

    let size_bytes = std::fs::metadata(dest)
        .map_err(|e| backup_error(dest, format!("snapshot not readable: {}", e)))?
        .len();
    tracing::info!(path = %dest.display(), size_bytes, "Binary backup completed");

    Ok(SnapshotInfo {
        path: dest.to_path_buf(),
        created_at: Utc::now(),
        size_bytes,
    })
}
