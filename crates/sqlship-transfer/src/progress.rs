//! Progress reporting
//!
//! A `ProgressSink` is invoked synchronously from inside an upload attempt.
//! The client never keeps the sink beyond the lifetime of its configuration.

/// Byte counters for one attempt; download fields stay zero for uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferProgress {
    pub download_total: u64,
    pub download_now: u64,
    pub upload_total: u64,
    pub upload_now: u64,
}

impl TransferProgress {
    /// Upload-direction progress
    pub fn upload(total: u64, sent: u64) -> Self {
        Self {
            upload_total: total,
            upload_now: sent,
            ..Self::default()
        }
    }

    /// Percentage of the upload sent, `None` while the total is unknown
    pub fn percent(&self) -> Option<u8> {
        if self.upload_total == 0 {
            return None;
        }
        let pct = self.upload_now.min(self.upload_total) * 100 / self.upload_total;
        Some(pct as u8)
    }
}

/// Receives progress notifications during an upload attempt
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, progress: TransferProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(TransferProgress) + Send + Sync,
{
    fn on_progress(&self, progress: TransferProgress) {
        self(progress)
    }
}
