//! sqlship CLI
//!
//! Populates a timestamped SQLite store, takes a consistent snapshot and
//! ships it to an FTP(S) server.
//!
//! Exit codes: 0 success, 1 invalid arguments, 2 backup or upload failed,
//! 3 configuration error (missing credential, logging unavailable).

use clap::error::ErrorKind;
use clap::Parser;
use sqlship_core::logging_facility::{init, LogOptions, Profile};
use sqlship_core::{AppConfig, ShipError};
use sqlship_engine::Orchestrator;
use std::process;

mod args;

use args::Args;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_ARGS: i32 = 1;
const EXIT_RUN_FAILED: i32 = 2;
const EXIT_CONFIG_ERROR: i32 = 3;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            let _ = e.print();
            process::exit(EXIT_INVALID_ARGS);
        }
    };

    process::exit(run(args));
}

fn exit_code(err: &ShipError) -> i32 {
    match err {
        ShipError::InvalidConfig { .. } => EXIT_INVALID_ARGS,
        err if err.is_config_error() => EXIT_CONFIG_ERROR,
        _ => EXIT_RUN_FAILED,
    }
}

fn run(args: Args) -> i32 {
    let config = match args
        .into_config(|name| std::env::var(name).ok())
        .and_then(|config| config.validate().map(|()| config))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code(&e);
        }
    };

    let _guard = match init(log_options(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {}", e);
            return EXIT_CONFIG_ERROR;
        }
    };

    tracing::info!(
        "Starting backup. FTP host: {}:{}, user: {}, pass: {}",
        config.host,
        config.port,
        config.user,
        config.password.masked()
    );
    tracing::debug!(
        rows = config.rows,
        retries = config.retries,
        timeout_secs = config.timeout_secs,
        ssl_verify = config.ssl_verify,
        tls = %config.tls,
        remote_dir = %config.remote_dir,
        "Run configuration"
    );

    if Orchestrator::from_config(&config).run() {
        println!("Backup and upload completed successfully.");
        EXIT_SUCCESS
    } else {
        eprintln!("Backup and upload failed. See logs for details.");
        EXIT_RUN_FAILED
    }
}

fn log_options(config: &AppConfig) -> LogOptions {
    LogOptions {
        level: config.log_level,
        profile: if config.json_logs {
            Profile::Production
        } else {
            Profile::Development
        },
        log_dir: Some(config.log_dir.clone()),
        max_file_size: config.log_max_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let invalid = ShipError::InvalidConfig {
            reason: "host must not be empty".to_string(),
        };
        let missing = ShipError::MissingCredential {
            variable: "FTP_PASS".to_string(),
        };
        let failed = ShipError::UploadFailed {
            attempts: 3,
            detail: "Timeout".to_string(),
        };
        assert_eq!(exit_code(&invalid), EXIT_INVALID_ARGS);
        assert_eq!(exit_code(&missing), EXIT_CONFIG_ERROR);
        assert_eq!(exit_code(&failed), EXIT_RUN_FAILED);
    }
}
