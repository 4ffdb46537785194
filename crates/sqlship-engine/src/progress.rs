//! Default progress sink: upload percentage at DEBUG

use sqlship_transfer::{ProgressSink, TransferProgress};
use std::sync::atomic::{AtomicU8, Ordering};

const UNSET: u8 = u8::MAX;

/// Logs the upload percentage each time it changes
#[derive(Debug)]
pub struct PercentLogger {
    last: AtomicU8,
}

impl PercentLogger {
    pub fn new() -> Self {
        Self {
            last: AtomicU8::new(UNSET),
        }
    }
}

impl Default for PercentLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for PercentLogger {
    fn on_progress(&self, progress: TransferProgress) {
        let Some(percent) = progress.percent() else {
            return;
        };
        if self.last.swap(percent, Ordering::Relaxed) != percent {
            tracing::debug!(
                sent = progress.upload_now,
                total = progress.upload_total,
                "Upload progress: {}%",
                percent
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlship_core::logging_facility::capture;

    #[test]
    fn test_logs_only_on_change() {
        let sink = PercentLogger::new();
        let ((), logs) = capture(|| {
            sink.on_progress(TransferProgress::upload(0, 0));
            sink.on_progress(TransferProgress::upload(200, 0));
            sink.on_progress(TransferProgress::upload(200, 1));
            sink.on_progress(TransferProgress::upload(200, 100));
            sink.on_progress(TransferProgress::upload(200, 200));
        });
        assert_eq!(
            logs.messages(),
            vec![
                "Upload progress: 0%".to_string(),
                "Upload progress: 50%".to_string(),
                "Upload progress: 100%".to_string(),
            ]
        );
    }
}
