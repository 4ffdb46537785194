//! sqlship Core - error, logging and configuration facilities
//!
//! This crate carries the ambient stack shared by every other sqlship crate:
//! - The error facility: `ShipError` taxonomy and the structured `ExError`
//! - The logging facility: subscriber initialization, op macros, rotating
//!   log files and scoped test capture
//! - Validated configuration (`AppConfig`) and credential resolution

pub mod config;
pub mod errors;
pub mod logging_facility;

pub use sqlship_core_types::schema;

// Re-export commonly used types
pub use config::{AppConfig, LogLevel, TlsMode};
pub use errors::{ExError, ExErrorKind, Result, ShipError};
