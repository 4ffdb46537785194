//! Validated run configuration
//!
//! The CLI parses raw arguments; this module owns the rules that make a
//! configuration valid before it reaches the store and transfer layers.

use crate::errors::{Result, ShipError};
use sqlship_core_types::Sensitive;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable consulted when the password argument is `-`
pub const PASSWORD_ENV_VAR: &str = "FTP_PASS";

/// Minimum log level, ordered `Debug < Info < Warning < Error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Equivalent tracing level
    pub fn as_tracing(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }

    /// Filter directive understood by `EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ShipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(ShipError::InvalidConfig {
                reason: format!(
                    "invalid log level '{}' (expected debug|info|warn|error)",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

/// How much of the FTP session must run over TLS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// TLS for both control and data connections, fail otherwise
    #[default]
    Required,
    /// Try TLS, fall back to plain FTP when the server refuses
    Optional,
    /// Plain FTP
    Disabled,
}

impl FromStr for TlsMode {
    type Err = ShipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "required" => Ok(TlsMode::Required),
            "optional" => Ok(TlsMode::Optional),
            "disabled" | "none" => Ok(TlsMode::Disabled),
            other => Err(ShipError::InvalidConfig {
                reason: format!(
                    "invalid TLS mode '{}' (expected required|optional|disabled)",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TlsMode::Required => "required",
            TlsMode::Optional => "optional",
            TlsMode::Disabled => "disabled",
        })
    }
}

/// Fully resolved configuration for one backup-and-ship run
///
/// SSL verification defaults to on; callers can only turn it off explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_prefix: PathBuf,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Sensitive<String>,
    pub remote_dir: String,
    pub rows: u32,
    pub retries: u32,
    pub timeout_secs: u64,
    pub ssl_verify: bool,
    pub tls: TlsMode,
    pub verbose: bool,
    pub log_level: LogLevel,
    pub log_dir: PathBuf,
    pub log_max_bytes: u64,
    pub json_logs: bool,
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Configuration with the documented defaults for everything optional
    pub fn new(
        store_prefix: impl Into<PathBuf>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: Sensitive<String>,
        remote_dir: impl Into<String>,
    ) -> Self {
        Self {
            store_prefix: store_prefix.into(),
            host: host.into(),
            port,
            user: user.into(),
            password,
            remote_dir: remote_dir.into(),
            rows: 100,
            retries: 3,
            timeout_secs: 30,
            ssl_verify: true,
            tls: TlsMode::Required,
            verbose: true,
            log_level: LogLevel::Info,
            log_dir: PathBuf::from("logs"),
            log_max_bytes: 0,
            json_logs: false,
            seed: None,
        }
    }

    /// Check every range rule
    ///
    /// # Errors
    ///
    /// Returns `ShipError::InvalidConfig` naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(ShipError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.store_prefix.as_os_str().is_empty() {
            return invalid("store prefix must not be empty");
        }
        if self.host.trim().is_empty() {
            return invalid("host must not be empty");
        }
        if self.port == 0 {
            return invalid("port out of valid range (1-65535)");
        }
        if self.rows == 0 {
            return invalid("rows must be > 0");
        }
        if self.timeout_secs == 0 {
            return invalid("timeout must be > 0");
        }
        Ok(())
    }

    /// Connect/response timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolve the password argument
///
/// The literal `-` means "read `FTP_PASS` through `lookup`"; anything else is
/// the password itself.
///
/// # Errors
///
/// Returns `ShipError::MissingCredential` when `-` is given and the variable
/// is not set.
pub fn resolve_password<F>(arg: &str, lookup: F) -> Result<Sensitive<String>>
where
    F: FnOnce(&str) -> Option<String>,
{
    if arg != "-" {
        return Ok(Sensitive::new(arg.to_string()));
    }
    lookup(PASSWORD_ENV_VAR)
        .map(Sensitive::new)
        .ok_or_else(|| ShipError::MissingCredential {
            variable: PASSWORD_ENV_VAR.to_string(),
        })
}
