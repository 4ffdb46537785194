//! Summary of a successful run

use serde::Serialize;
use sqlship_core_types::RunId;
use sqlship_store::SnapshotInfo;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub rows_inserted: u32,
    /// Rows in the store after the insert, including earlier runs
    pub total_rows: u64,
    pub snapshot: SnapshotInfo,
    pub remote_url: String,
    /// Attempt on which the upload succeeded
    pub attempts: u32,
    pub duration_ms: u64,
}

impl RunReport {
    /// JSON rendering for the run log
    ///
    /// # Errors
    ///
    /// Returns the serializer error; `RunReport` holds only plain data so
    /// this does not happen in practice.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
