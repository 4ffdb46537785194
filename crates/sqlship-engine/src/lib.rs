//! sqlship Engine - orchestration layer
//!
//! Sequences the snapshot store and the transfer client for one run:
//! populate the store, take a consistent snapshot, ship it, and remove the
//! snapshot again whatever happened. `Orchestrator::run` is the boundary
//! where every failure becomes a logged pass/fail result.

pub mod artifact;
pub mod orchestrator;
pub mod progress;
pub mod report;
pub mod settings;

pub use artifact::TempArtifact;
pub use orchestrator::Orchestrator;
pub use progress::PercentLogger;
pub use report::RunReport;
pub use settings::{transfer_config, RunSettings};
