//! Command-line surface

use clap::Parser;
use sqlship_core::config::resolve_password;
use sqlship_core::errors::Result;
use sqlship_core::{AppConfig, LogLevel, TlsMode};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sqlship")]
#[command(
    about = "Populate a SQLite store, snapshot it and upload the snapshot over FTP(S)",
    long_about = None
)]
#[command(after_help = "If PASSWORD is '-', the password is read from the FTP_PASS environment variable.")]
pub struct Args {
    /// Path prefix for the store and snapshot files
    pub store_prefix: PathBuf,

    /// FTP server host
    pub host: String,

    /// FTP server port (1-65535)
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// FTP user
    pub user: String,

    /// FTP password, or '-' to read FTP_PASS
    #[arg(value_name = "PASSWORD")]
    pub password: String,

    /// Remote directory receiving the snapshot
    pub remote_dir: String,

    /// Disable peer and host certificate verification
    #[arg(long)]
    pub no_ssl_verify: bool,

    /// Rows inserted before the snapshot
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub rows: u32,

    /// Upload attempts (0 behaves as 1)
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Connect/response timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Minimum log level: debug, info, warn or error
    #[arg(long, default_value = "info", value_parser = parse_log_level)]
    pub log_level: LogLevel,

    /// TLS use: required, optional or disabled
    #[arg(long, default_value = "required", value_parser = parse_tls_mode)]
    pub tls: TlsMode,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Rotate the log file after this many bytes (0 = never)
    #[arg(long, default_value_t = 0)]
    pub log_max_bytes: u64,

    /// JSON console logs
    #[arg(long)]
    pub json_logs: bool,

    /// Seed for the synthetic rows
    #[arg(long, env = "SQLSHIP_SEED")]
    pub seed: Option<u64>,

    /// Do not write the FTP protocol trace to the debug log
    #[arg(long)]
    pub no_protocol_trace: bool,
}

fn parse_log_level(s: &str) -> std::result::Result<LogLevel, String> {
    s.parse().map_err(|e: sqlship_core::ShipError| e.to_string())
}

fn parse_tls_mode(s: &str) -> std::result::Result<TlsMode, String> {
    s.parse().map_err(|e: sqlship_core::ShipError| e.to_string())
}

impl Args {
    /// Resolve the credential and build the run configuration
    ///
    /// # Errors
    ///
    /// Returns `ShipError::MissingCredential` if the password is `-` and
    /// `lookup` finds no `FTP_PASS`.
    pub fn into_config<F>(self, lookup: F) -> Result<AppConfig>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let password = resolve_password(&self.password, lookup)?;
        let mut config = AppConfig::new(
            self.store_prefix,
            self.host,
            self.port,
            self.user,
            password,
            self.remote_dir,
        );
        config.rows = self.rows;
        config.retries = self.retries;
        config.timeout_secs = self.timeout;
        config.ssl_verify = !self.no_ssl_verify;
        config.tls = self.tls;
        config.verbose = !self.no_protocol_trace;
        config.log_level = self.log_level;
        config.log_dir = self.log_dir;
        config.log_max_bytes = self.log_max_bytes;
        config.json_logs = self.json_logs;
        config.seed = self.seed;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlship_core::ShipError;

    const POSITIONAL: [&str; 7] = ["sqlship", "data/people", "ftp.local", "21", "backup", "pw", "in"];

    fn parse(extra: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(POSITIONAL.iter().chain(extra.iter()).copied())
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap().into_config(|_| None).unwrap();
        assert_eq!(config.rows, 100);
        assert_eq!(config.retries, 3);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.ssl_verify);
        assert!(config.verbose);
        assert_eq!(config.tls, TlsMode::Required);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_options() {
        let args = parse(&[
            "--no-ssl-verify",
            "--rows",
            "5",
            "--retries",
            "0",
            "--timeout",
            "3",
            "--log-level",
            "warn",
            "--tls",
            "disabled",
            "--seed",
            "9",
            "--no-protocol-trace",
        ])
        .unwrap();
        let config = args.into_config(|_| None).unwrap();
        assert!(!config.ssl_verify);
        assert_eq!(config.rows, 5);
        assert_eq!(config.retries, 0);
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.log_level, LogLevel::Warning);
        assert_eq!(config.tls, TlsMode::Disabled);
        assert_eq!(config.seed, Some(9));
        assert!(!config.verbose);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(Args::try_parse_from(["sqlship", "p", "h", "0", "u", "pw", "d"]).is_err());
        assert!(Args::try_parse_from(["sqlship", "p", "h", "65536", "u", "pw", "d"]).is_err());
        assert!(parse(&["--rows", "0"]).is_err());
        assert!(parse(&["--timeout", "0"]).is_err());
        assert!(parse(&["--retries", "-1"]).is_err());
        assert!(parse(&["--log-level", "loud"]).is_err());
        assert!(parse(&["--tls", "maybe"]).is_err());
    }

    #[test]
    fn test_missing_positional_rejected() {
        assert!(Args::try_parse_from(["sqlship", "p", "h", "21"]).is_err());
    }

    #[test]
    fn test_dash_password_reads_env() {
        let args = Args::try_parse_from(["sqlship", "p", "h", "21", "u", "-", "d"]).unwrap();
        let config = args.into_config(|_| Some("from-env".to_string())).unwrap();
        assert_eq!(config.password.expose(), "from-env");

        let args = Args::try_parse_from(["sqlship", "p", "h", "21", "u", "-", "d"]).unwrap();
        let err = args.into_config(|_| None).unwrap_err();
        assert!(matches!(err, ShipError::MissingCredential { .. }));
    }
}
