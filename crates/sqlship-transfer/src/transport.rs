//! The seam between the retry loop and the wire
//!
//! A `Transport` performs exactly one attempt on a fresh connection. It
//! reports what happened through `TransferEvents` and classifies failure so
//! the client knows whether retrying can help.

use crate::config::TransferConfig;
use crate::progress::TransferProgress;
use std::fmt;
use std::io::Read;

/// Everything a transport needs for one attempt
#[derive(Debug)]
pub struct UploadRequest<'a> {
    /// Fully built destination URL
    pub url: &'a str,
    /// Size of the body in bytes
    pub size: u64,
    pub config: &'a TransferConfig,
}

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The connection handle could not be created or configured; retrying
    /// the same configuration will not help
    Setup(String),
    /// The transfer itself failed (connect, login, TLS, timeout, I/O)
    Transfer(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Setup(msg) | AttemptFailure::Transfer(msg) => f.write_str(msg),
        }
    }
}

/// Callbacks raised from inside an attempt
pub trait TransferEvents {
    fn progress(&self, progress: TransferProgress);

    /// One line of server response (no line terminator)
    fn server_line(&self, line: &str);

    /// One line of protocol trace, only raised in verbose mode
    fn trace(&self, line: &str);
}

/// Performs one upload attempt
pub trait Transport: Send + Sync {
    /// Stream `body` to `request.url`
    ///
    /// # Errors
    ///
    /// Returns `AttemptFailure::Setup` when the connection cannot be
    /// configured and `AttemptFailure::Transfer` for everything after.
    fn upload(
        &self,
        request: &UploadRequest<'_>,
        body: &mut dyn Read,
        events: &dyn TransferEvents,
    ) -> Result<(), AttemptFailure>;
}

/// Split a raw response chunk into trimmed, non-empty lines
pub fn response_lines(data: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(data)
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
