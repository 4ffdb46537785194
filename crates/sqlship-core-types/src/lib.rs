//! Core types shared across sqlship facilities
//!
//! This crate provides foundational types used by the error, logging,
//! store and transfer layers:
//!
//! - **Correlation**: `RunId` tags every log event of one backup run
//! - **Sensitive data**: `Sensitive<T>` marker for automatic redaction
//! - **Schema constants**: canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
