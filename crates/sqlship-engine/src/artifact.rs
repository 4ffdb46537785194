//! Scoped ownership of the temporary snapshot file

use std::io;
use std::path::{Path, PathBuf};

/// Removes its file when dropped
///
/// Covers every exit path of a run, including early returns and unwinding.
/// A file that was never created is not an error; any other removal failure
/// is logged at WARN and otherwise ignored.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Temporary backup file removed");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Failed to remove temporary backup file: {}",
                    e
                );
            }
        }
    }
}
