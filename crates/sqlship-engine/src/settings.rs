//! Per-run settings derived from the validated configuration

use crate::progress::PercentLogger;
use sqlship_core::AppConfig;
use sqlship_store::BackupOptions;
use sqlship_transfer::TransferConfig;
use std::path::PathBuf;
use std::sync::Arc;

/// What one run stores, snapshots and where it ships the snapshot
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Store and snapshot file names are derived from this prefix
    pub store_prefix: PathBuf,
    pub remote_dir: String,
    pub rows: u32,
    /// Fixed generator seed; `None` falls back to `SQLSHIP_SEED` or entropy
    pub seed: Option<u64>,
    pub backup: BackupOptions,
}

impl RunSettings {
    pub fn new(store_prefix: impl Into<PathBuf>, remote_dir: impl Into<String>) -> Self {
        Self {
            store_prefix: store_prefix.into(),
            remote_dir: remote_dir.into(),
            rows: 100,
            seed: None,
            backup: BackupOptions::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            rows: config.rows,
            seed: config.seed,
            ..Self::new(config.store_prefix.clone(), config.remote_dir.clone())
        }
    }

    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_backup_options(mut self, backup: BackupOptions) -> Self {
        self.backup = backup;
        self
    }
}

/// Transfer settings for `config`, reporting progress through `PercentLogger`
pub fn transfer_config(config: &AppConfig) -> TransferConfig {
    TransferConfig::new(
        config.host.clone(),
        config.port,
        config.user.clone(),
        config.password.clone(),
    )
    .with_retries(config.retries)
    .with_timeout(config.timeout())
    .with_ssl_verify(config.ssl_verify)
    .with_tls(config.tls)
    .with_verbose(config.verbose)
    .with_progress_sink(Arc::new(PercentLogger::new()))
}
