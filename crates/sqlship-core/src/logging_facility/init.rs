//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility. The
//! binary calls `init` once and owns the returned guard for the life of
//! the process.

use crate::config::LogLevel;
use crate::errors::{Result, ShipError};
use crate::logging_facility::rotating::{LogFile, RotatingFileWriter};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Human-readable, coloured console output
    #[default]
    Development,
    /// JSON structured console output
    Production,
}

/// Everything `init` needs to build the subscriber
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub level: LogLevel,
    pub profile: Profile,
    /// Directory for `app_<timestamp>.log` files; `None` logs to console only
    pub log_dir: Option<PathBuf>,
    /// Rotate once a file reaches this many bytes (0 = never)
    pub max_file_size: u64,
}

/// Owner of the process-wide log file
///
/// Dropping the guard flushes the file. Only the first `init` call returns
/// a guard that owns a file.
#[derive(Debug)]
pub struct LoggingGuard {
    file: Option<LogFile>,
}

impl LoggingGuard {
    /// Path of the log file being written, if file logging is active
    pub fn log_file(&self) -> Option<PathBuf> {
        self.file.as_ref().and_then(LogFile::current_path)
    }
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// `RUST_LOG`, when set, overrides the configured minimum level.
///
/// # Errors
///
/// Returns `ShipError::Io` if the log directory or file cannot be created,
/// and `ShipError::Internal` if another subscriber was already installed.
pub fn init(options: LogOptions) -> Result<LoggingGuard> {
    let mut outcome = Ok(LoggingGuard { file: None });
    INIT_ONCE.call_once(|| {
        outcome = install(&options);
    });
    outcome
}

fn install(options: &LogOptions) -> Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.level.as_directive()));

    let file = match &options.log_dir {
        Some(dir) => Some(LogFile::new(RotatingFileWriter::open(
            dir,
            options.max_file_size,
        )?)),
        None => None,
    };
    let file_layer = file
        .clone()
        .map(|writer| fmt::layer().with_ansi(false).with_writer(writer));

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    let installed = match options.profile {
        Profile::Development => registry.with(fmt::layer()).try_init(),
        Profile::Production => registry.with(fmt::layer().json()).try_init(),
    };
    installed.map_err(|e| ShipError::Internal {
        reason: format!("failed to install log subscriber: {}", e),
    })?;

    Ok(LoggingGuard { file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        // Only the first call installs; later calls hand back a detached guard
        let _first = init(LogOptions::default());
        let second = init(LogOptions::default()).unwrap();
        assert!(second.log_file().is_none());
    }

    #[test]
    fn test_default_options() {
        let options = LogOptions::default();
        assert_eq!(options.level, LogLevel::Info);
        assert_eq!(options.profile, Profile::Development);
        assert!(options.log_dir.is_none());
        assert_eq!(options.max_file_size, 0);
    }
}
