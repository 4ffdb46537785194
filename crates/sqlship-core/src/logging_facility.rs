//! Structured logging facility for sqlship
//!
//! This module provides the canonical logging facility with:
//! - Single initialization point via `init(options)`, owned by the binary
//! - Console output plus an optional size-rotated log file
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Scoped test capture for deterministic assertions
//!
//! # Usage
//!
//! ```no_run
//! use sqlship_core::logging_facility::{init, LogOptions};
//!
//! // Initialize once at application startup and keep the guard alive
//! let _guard = init(LogOptions::default()).expect("logging");
//! ```
//!
//! # Logging Macros
//!
//! - `log_op_start!(op, ...)` - Log operation start
//! - `log_op_end!(op, duration_ms = ...)` - Log operation end
//! - `log_op_error!(op, err, duration_ms = ...)` - Log operation error

pub mod init;
pub mod macros;
pub mod rotating;
pub mod test_capture;

pub use init::{init, LogOptions, LoggingGuard, Profile};
pub use rotating::{LogFile, RotatingFileWriter};
pub use test_capture::{capture, CapturedEvent, TestCapture};
