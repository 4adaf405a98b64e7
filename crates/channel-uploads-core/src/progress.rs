//! Run-wide progress accounting
//!
//! The estimate grows as each channel reports its first page, so the raw
//! ratio can drop when a new channel starts. Published percentages are
//! held at their previous maximum instead.

use serde::{Deserialize, Serialize};

/// Processed rows against the accumulated estimate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProgress {
    pub processed_videos: u64,
    pub total_videos_estimate: u64,
}

impl RunProgress {
    /// `floor(processed / estimate * 100)` clamped to 100, `None` while the estimate is zero
    pub fn percent(&self) -> Option<u8> {
        if self.total_videos_estimate == 0 {
            return None;
        }
        let ratio = self.processed_videos.saturating_mul(100) / self.total_videos_estimate;
        Some(ratio.min(100) as u8)
    }
}

/// Tracks [`RunProgress`] and the last percentage published
#[derive(Debug, Default)]
pub struct ProgressTracker {
    progress: RunProgress,
    published: u8,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel's reported total, taken from its first page
    pub fn add_channel_estimate(&mut self, total: u64) {
        self.progress.total_videos_estimate =
            self.progress.total_videos_estimate.saturating_add(total);
    }

    /// Count one emitted row and return the percentage to publish
    ///
    /// The processed count never passes the estimate, and the returned
    /// value never drops below one returned earlier.
    pub fn record_row(&mut self) -> u8 {
        if self.progress.processed_videos < self.progress.total_videos_estimate {
            self.progress.processed_videos += 1;
        }
        if let Some(percent) = self.progress.percent() {
            self.published = self.published.max(percent);
        }
        self.published
    }

    pub fn snapshot(&self) -> RunProgress {
        self.progress
    }

    /// Last percentage returned by [`record_row`](Self::record_row)
    pub fn published(&self) -> u8 {
        self.published
    }
}
