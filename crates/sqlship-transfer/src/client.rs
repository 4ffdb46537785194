//! Retrying upload client

use crate::backoff::{backoff_delay, Sleeper, ThreadSleeper};
use crate::config::TransferConfig;
use crate::curl_transport::CurlTransport;
use crate::progress::{ProgressSink, TransferProgress};
use crate::transport::{AttemptFailure, Transport, TransferEvents, UploadRequest};
use crate::url::build_url;
use sqlship_core::errors::{Result, ShipError};
use sqlship_core::{log_op_end, log_op_error, log_op_start};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub url: String,
    /// 1-based number of the attempt that succeeded
    pub attempts: u32,
    pub bytes: u64,
}

/// Routes attempt callbacks to the log and the configured sink
struct AttemptEvents<'a> {
    sink: Option<&'a Arc<dyn ProgressSink>>,
}

impl TransferEvents for AttemptEvents<'_> {
    fn progress(&self, progress: TransferProgress) {
        if let Some(sink) = self.sink {
            sink.on_progress(progress);
        }
    }

    fn server_line(&self, line: &str) {
        tracing::info!("FTP server: {}", line);
    }

    fn trace(&self, line: &str) {
        tracing::debug!(target: "sqlship_transfer::protocol", "{}", line);
    }
}

/// Uploads one file per call, retrying failed attempts with backoff
pub struct TransferClient<T: Transport = CurlTransport, S: Sleeper = ThreadSleeper> {
    config: TransferConfig,
    transport: T,
    sleeper: S,
}

impl TransferClient {
    /// Client using libcurl and real sleeps
    pub fn new(config: TransferConfig) -> Self {
        Self::with_transport(config, CurlTransport::new(), ThreadSleeper)
    }
}

impl<T: Transport, S: Sleeper> TransferClient<T, S> {
    pub fn with_transport(config: TransferConfig, transport: T, sleeper: S) -> Self {
        Self {
            config,
            transport,
            sleeper,
        }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Destination URL for `filename` under `remote_dir` on this server
    pub fn build_url(&self, remote_dir: &str, filename: &str) -> String {
        build_url(self.config.host(), self.config.port(), remote_dir, filename)
    }

    /// Upload `local_path` into `remote_dir`, keeping its file name
    ///
    /// Every attempt reopens the file and starts a new connection. Between
    /// failed attempts the client sleeps `backoff_delay(attempt)`; no sleep
    /// follows the final attempt.
    ///
    /// # Errors
    ///
    /// - `ShipError::LocalFileMissing` if the file is absent (no attempt made)
    /// - `ShipError::ConnectionInitFailed` if a connection cannot be set up
    /// - `ShipError::UploadFailed` once every attempt failed, carrying the
    ///   last attempt's error text
    pub fn upload_file(&self, local_path: &Path, remote_dir: &str) -> Result<UploadOutcome> {
        let start = Instant::now();
        log_op_start!("upload_file", path = %local_path.display(), remote_dir = remote_dir);

        let result = self.upload_with_retries(local_path, remote_dir);
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => {
                log_op_end!(
                    "upload_file",
                    duration_ms = duration_ms,
                    url = %outcome.url,
                    attempts = outcome.attempts
                );
            }
            Err(err) => {
                log_op_error!("upload_file", *err, duration_ms = duration_ms);
            }
        }
        result
    }

    fn upload_with_retries(&self, local_path: &Path, remote_dir: &str) -> Result<UploadOutcome> {
        if !local_path.is_file() {
            tracing::error!(path = %local_path.display(), "Local file does not exist");
            return Err(ShipError::LocalFileMissing {
                path: local_path.to_path_buf(),
            });
        }

        let filename = local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ShipError::LocalFileMissing {
                path: local_path.to_path_buf(),
            })?;
        let url = self.build_url(remote_dir, &filename);
        let max_attempts = self.config.max_retries();
        tracing::info!(
            url = %url,
            max_attempts,
            "Preparing to upload {} to {}",
            local_path.display(),
            url
        );

        let events = AttemptEvents {
            sink: self.config.progress_sink(),
        };
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            tracing::info!(attempt, max_attempts, "Upload attempt {} of {}", attempt, max_attempts);

            let mut file = File::open(local_path).map_err(|_| ShipError::LocalFileMissing {
                path: local_path.to_path_buf(),
            })?;
            let size = file
                .metadata()
                .map_err(|e| ShipError::io("upload_file", &e))?
                .len();
            let request = UploadRequest {
                url: &url,
                size,
                config: &self.config,
            };

            match self.transport.upload(&request, &mut file, &events) {
                Ok(()) => {
                    tracing::info!(attempt, bytes = size, "Upload succeeded: {}", url);
                    return Ok(UploadOutcome {
                        url,
                        attempts: attempt,
                        bytes: size,
                    });
                }
                Err(AttemptFailure::Setup(reason)) => {
                    tracing::error!(attempt, "Connection setup failed: {}", reason);
                    return Err(ShipError::ConnectionInitFailed { reason });
                }
                Err(AttemptFailure::Transfer(reason)) => {
                    tracing::warn!(attempt, max_attempts, "Upload attempt {} failed: {}", attempt, reason);
                    last_error = reason;
                }
            }

            if attempt < max_attempts {
                let delay = backoff_delay(attempt);
                tracing::info!(
                    delay_ms = delay.as_millis() as u64,
                    "Retrying in {} ms",
                    delay.as_millis()
                );
                self.sleeper.sleep(delay);
            }
        }

        Err(ShipError::UploadFailed {
            attempts: max_attempts,
            detail: last_error,
        })
    }
}
