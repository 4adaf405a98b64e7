//! Channel Uploads Tauri Integration
//!
//! Provides a Tauri plugin that runs channel enumerations for the frontend
//! and forwards pipeline events to the webview.
//!
//! # Usage
//!
//! Register the plugin in your Tauri application:
//!
//! ```ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(channel_uploads_tauri::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! Then invoke commands and listen for events from the frontend:
//!
//! ```javascript
//! import { invoke } from '@tauri-apps/api/core';
//! import { listen } from '@tauri-apps/api/event';
//!
//! await listen('channel-uploads://row', (event) => console.log(event.payload));
//! await listen('channel-uploads://progress', (event) => setProgress(event.payload.percent));
//!
//! await invoke('plugin:channel-uploads|start_enumeration', {
//!   apiKey: 'AIza...',
//!   handles: ['@Alpha', '@Beta']
//! });
//!
//! // After `channel-uploads://run-complete`
//! const summary = await invoke('plugin:channel-uploads|export_channels', {
//!   selected: ['Alpha'],
//!   format: 'csv',
//!   directory: '/home/me/exports'
//! });
//! ```

use std::sync::Arc;
use tokio::sync::Mutex;

use channel_uploads_core::{
    export_rows, CancellationToken, ExportRequest, ExportSummary, RunReport, UploadsError,
};
use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

mod commands;
mod events;

pub use events::{
    ChannelEvent, EventObserver, FailureEvent, ProgressEvent, RunCompleteEvent, RunErrorEvent,
    CHANNEL_FAILED_EVENT, CHANNEL_STARTED_EVENT, PROGRESS_EVENT, ROW_EVENT, RUN_COMPLETE_EVENT,
    RUN_ERROR_EVENT,
};

/// Shared state for the enumeration commands
///
/// Holds the report of the last finished run and the cancellation token of
/// the run in progress, if any. Only one run is active at a time.
#[derive(Default)]
pub struct EnumeratorState {
    pub(crate) last_report: Arc<Mutex<Option<RunReport>>>,
    pub(crate) active: Arc<Mutex<Option<CancellationToken>>>,
}

impl EnumeratorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run has been started and has not finished yet
    pub async fn is_running(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Claim the run slot for `cancel` and drop the previous run's report
    ///
    /// # Errors
    /// Returns error message as String if a run is already active
    pub(crate) async fn begin_run(&self, cancel: CancellationToken) -> Result<(), String> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err("An enumeration is already running".to_string());
        }
        *active = Some(cancel);
        *self.last_report.lock().await = None;
        Ok(())
    }

    /// Export rows from the last finished run
    ///
    /// # Errors
    /// Returns error message as String while a run is active, when no run
    /// has finished yet, or when the export itself is rejected
    pub(crate) async fn export_last_report(
        &self,
        request: &ExportRequest,
    ) -> Result<ExportSummary, String> {
        let active = self.active.lock().await;
        if active.is_some() {
            return Err("An enumeration is running; export once it has finished".to_string());
        }

        let last_report = self.last_report.lock().await;
        let report = last_report
            .as_ref()
            .ok_or_else(|| UploadsError::InputInvalid("No data to save".to_string()).to_string())?;

        export_rows(&report.rows, request).map_err(|e| e.to_string())
    }
}

/// Initialize the channel-uploads plugin
///
/// # Returns
/// A configured TauriPlugin ready to be registered with the Tauri application
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("channel-uploads")
        .invoke_handler(tauri::generate_handler![
            commands::start_enumeration,
            commands::cancel_enumeration,
            commands::last_report,
            commands::export_channels
        ])
        .setup(|app, _api| {
            app.manage(EnumeratorState::new());
            Ok(())
        })
        .build()
}

// Re-export types for convenience
pub use channel_uploads_core::{ExportFormat, ExportSummary, VideoRow};
