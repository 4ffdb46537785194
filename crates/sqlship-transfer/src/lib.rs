//! sqlship Transfer - resilient single-file FTP(S) uploads
//!
//! The `TransferClient` moves exactly one local file into a remote
//! directory. Each attempt opens a fresh connection through a `Transport`;
//! failed attempts are retried with exponential backoff up to the configured
//! limit, and only the last attempt's error is surfaced.
//!
//! ```no_run
//! use sqlship_core_types::Sensitive;
//! use sqlship_transfer::{TransferClient, TransferConfig};
//! use std::path::Path;
//!
//! # fn main() -> sqlship_core::Result<()> {
//! let config = TransferConfig::new("ftp.example.com", 21, "backup", Sensitive::new("pw".into()))
//!     .with_retries(3);
//! let client = TransferClient::new(config);
//! client.upload_file(Path::new("people_backup.sqlite"), "nightly/")?;
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod client;
pub mod config;
pub mod curl_transport;
pub mod progress;
pub mod transport;
pub mod url;

pub use backoff::{backoff_delay, Sleeper, ThreadSleeper};
pub use client::{TransferClient, UploadOutcome};
pub use config::TransferConfig;
pub use curl_transport::CurlTransport;
pub use progress::{ProgressSink, TransferProgress};
pub use sqlship_core::TlsMode;
pub use transport::{AttemptFailure, Transport, TransferEvents, UploadRequest};
pub use url::build_url;
