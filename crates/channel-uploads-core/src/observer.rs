//! Observer interface for run events
//!
//! The orchestrator reports everything a front end needs through
//! [`RunObserver`]. Calls happen on the task driving the run, in pipeline
//! order; implementations should return quickly.

use crate::error::UploadsError;
use crate::orchestrator::RunStatus;
use crate::types::{ChannelHandle, VideoRow};

pub trait RunObserver: Send + Sync {
    /// Channel resolved; fires before its first row, even if it yields none
    fn on_channel_started(&self, _channel: &ChannelHandle) {}

    fn on_row_emitted(&self, _row: &VideoRow) {}

    /// Run-wide percentage, published after every row and never decreasing
    fn on_progress(&self, _percent: u8) {}

    fn on_channel_failed(&self, _channel: &ChannelHandle, _error: &UploadsError) {}

    /// Every handle reached a terminal state, or the run was cancelled
    fn on_run_complete(&self, _status: RunStatus) {}
}

/// Silent observer
impl RunObserver for () {}
