//! One backup-and-ship run
//!
//! Strictly sequential: the snapshot is complete before the upload starts,
//! and the snapshot file is removed before `run` returns on every path.

use crate::artifact::TempArtifact;
use crate::report::RunReport;
use crate::settings::{transfer_config, RunSettings};
use chrono::Local;
use sqlship_core::errors::{Result, ShipError};
use sqlship_core::{log_op_end, log_op_error, log_op_start, AppConfig};
use sqlship_core_types::RunId;
use sqlship_store::paths::snapshot_path;
use sqlship_store::{RowGenerator, SnapshotStore};
use sqlship_transfer::{CurlTransport, Sleeper, ThreadSleeper, TransferClient, Transport};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Composes the snapshot store and the transfer client
pub struct Orchestrator<T: Transport = CurlTransport, S: Sleeper = ThreadSleeper> {
    settings: RunSettings,
    client: TransferClient<T, S>,
}

impl Orchestrator {
    /// Production wiring: libcurl transport, real sleeps, DEBUG progress
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            RunSettings::from_config(config),
            TransferClient::new(transfer_config(config)),
        )
    }
}

impl<T: Transport, S: Sleeper> Orchestrator<T, S> {
    pub fn new(settings: RunSettings, client: TransferClient<T, S>) -> Self {
        Self { settings, client }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn client(&self) -> &TransferClient<T, S> {
        &self.client
    }

    /// Run once and report pass/fail
    ///
    /// Never panics and never returns an error: failures (including panics
    /// raised below this point) are logged with their full context and
    /// turned into `false`.
    pub fn run(&self) -> bool {
        let run_id = RunId::new();
        let span = tracing::info_span!("run", run_id = %run_id);
        let _entered = span.enter();

        match panic::catch_unwind(AssertUnwindSafe(|| self.execute_as(run_id.clone()))) {
            Ok(Ok(report)) => {
                match report.to_json() {
                    Ok(json) => {
                        tracing::info!(report = %json, "Backup and upload succeeded");
                    }
                    Err(e) => {
                        tracing::warn!("Backup and upload succeeded; report unavailable: {}", e);
                    }
                }
                true
            }
            Ok(Err(err)) => {
                tracing::error!(
                    err_code = err.kind().code(),
                    "Backup or upload failed: {}",
                    err
                );
                false
            }
            Err(payload) => {
                tracing::error!(
                    "Unexpected failure during run: {}",
                    panic_message(payload.as_ref())
                );
                false
            }
        }
    }

    /// Run once and return the report or the causal error
    ///
    /// # Errors
    ///
    /// Propagates the first store or transfer error unmodified. The snapshot
    /// file is removed before returning either way.
    pub fn execute(&self) -> Result<RunReport> {
        self.execute_as(RunId::new())
    }

    fn execute_as(&self, run_id: RunId) -> Result<RunReport> {
        log_op_start!("run", run_id = %run_id);
        let started = Instant::now();

        let result = self.sequence(run_id, started);
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                log_op_end!(
                    "run",
                    duration_ms = duration_ms,
                    run_id = %report.run_id,
                    rows = report.rows_inserted
                );
            }
            Err(err) => {
                log_op_error!("run", *err, duration_ms = duration_ms);
            }
        }
        result
    }

    fn sequence(&self, run_id: RunId, started: Instant) -> Result<RunReport> {
        let settings = &self.settings;
        let now = Local::now();

        if let Some(parent) = settings.store_prefix.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ShipError::io("create_store_dir", &e))?;
            }
        }

        let mut store = SnapshotStore::open_timestamped(&settings.store_prefix, now)?;
        store.ensure_schema()?;

        let mut generator = match settings.seed {
            Some(seed) => RowGenerator::seeded(seed),
            None => RowGenerator::from_env(),
        };
        let rows_inserted = store.insert_with(settings.rows, &mut generator)?;
        let total_rows = store.row_count()?;
        tracing::info!(rows = total_rows, "Total rows in people: {}", total_rows);

        let artifact = TempArtifact::new(snapshot_path(&settings.store_prefix, now));
        let snapshot = store.backup_with(artifact.path(), &settings.backup)?;
        tracing::info!(
            path = %snapshot.path.display(),
            size_bytes = snapshot.size_bytes,
            "Snapshot created"
        );

        let outcome = self.client.upload_file(artifact.path(), &settings.remote_dir)?;
        drop(artifact);

        Ok(RunReport {
            run_id,
            rows_inserted,
            total_rows,
            snapshot,
            remote_url: outcome.url,
            attempts: outcome.attempts,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
