//! Pipeline events forwarded to the webview

use channel_uploads_core::{
    ChannelHandle, RunObserver, RunReport, RunStatus, UploadsError, VideoRow,
};
use serde::Serialize;
use tauri::{AppHandle, Emitter, Runtime};

pub const CHANNEL_STARTED_EVENT: &str = "channel-uploads://channel-started";
pub const ROW_EVENT: &str = "channel-uploads://row";
pub const PROGRESS_EVENT: &str = "channel-uploads://progress";
pub const CHANNEL_FAILED_EVENT: &str = "channel-uploads://channel-failed";
pub const RUN_COMPLETE_EVENT: &str = "channel-uploads://run-complete";
/// Emitted when a run could not start or ended with an error
pub const RUN_ERROR_EVENT: &str = "channel-uploads://run-error";

#[derive(Debug, Clone, Serialize)]
pub struct ChannelEvent {
    pub channel: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProgressEvent {
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureEvent {
    pub channel: String,
    pub error: String,
}

/// Sent once the run's report is stored and `last_report` can be read
#[derive(Debug, Clone, Serialize)]
pub struct RunCompleteEvent {
    pub status: RunStatus,
    pub rows: usize,
    /// Channels that failed, in input order
    pub failed: Vec<String>,
}

impl RunCompleteEvent {
    pub fn from_report(report: &RunReport) -> Self {
        Self {
            status: report.status,
            rows: report.rows.len(),
            failed: report
                .failures()
                .map(|failure| failure.channel.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunErrorEvent {
    pub error: String,
}

/// Emit a global app event, logging instead of failing
pub(crate) fn emit<R: Runtime, S: Serialize + Clone>(app: &AppHandle<R>, event: &str, payload: S) {
    if let Err(e) = app.emit(event, payload) {
        tracing::warn!(event, error = %e, "failed to emit event");
    }
}

/// [`RunObserver`] that emits every callback as a global app event
pub struct EventObserver<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> EventObserver<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }

    fn emit<S: Serialize + Clone>(&self, event: &str, payload: S) {
        emit(&self.app, event, payload);
    }
}

impl<R: Runtime> RunObserver for EventObserver<R> {
    fn on_channel_started(&self, channel: &ChannelHandle) {
        self.emit(
            CHANNEL_STARTED_EVENT,
            ChannelEvent {
                channel: channel.to_string(),
            },
        );
    }

    fn on_row_emitted(&self, row: &VideoRow) {
        self.emit(ROW_EVENT, row.clone());
    }

    fn on_progress(&self, percent: u8) {
        self.emit(PROGRESS_EVENT, ProgressEvent { percent });
    }

    fn on_channel_failed(&self, channel: &ChannelHandle, error: &UploadsError) {
        self.emit(
            CHANNEL_FAILED_EVENT,
            FailureEvent {
                channel: channel.to_string(),
                error: error.to_string(),
            },
        );
    }

    // Completion is emitted by `start_enumeration` after the report is stored
}
