//! Tauri commands for channel enumeration
//!
//! This module contains all Tauri command implementations.

use std::path::PathBuf;
use std::sync::Arc;

use channel_uploads_core::{
    CancellationToken, ChannelEnumerator, ChannelHandle, ClientConfig, ExportFormat,
    ExportRequest, ExportSummary, RetryPolicy, RunReport, UploadsError,
};
use tauri::{AppHandle, Runtime, State};

use crate::events::{
    emit, EventObserver, RunCompleteEvent, RunErrorEvent, RUN_COMPLETE_EVENT, RUN_ERROR_EVENT,
};
use crate::EnumeratorState;

/// Start enumerating the uploads of `handles` in the background
///
/// Returns as soon as the run is started. Rows, progress and per-channel
/// failures arrive as `channel-uploads://*` events, followed by
/// `run-complete` once [`last_report`] holds the result.
///
/// # Arguments
/// * `api_key` - YouTube Data API key
/// * `handles` - Channel handles, with or without `@`
///
/// # Errors
/// Returns error message as String if the input is invalid or a run is
/// already active
#[tauri::command]
pub async fn start_enumeration<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, EnumeratorState>,
    api_key: String,
    handles: Vec<String>,
) -> Result<(), String> {
    validate_handles(&handles).map_err(|e| e.to_string())?;

    let cancel = CancellationToken::new();
    let retry = RetryPolicy::default().with_cancellation(cancel.clone());
    let enumerator = ChannelEnumerator::with_config(ClientConfig::new(api_key), retry)
        .map_err(|e| e.to_string())?;
    state.begin_run(cancel).await?;

    let last_report = Arc::clone(&state.last_report);
    let active = Arc::clone(&state.active);
    tracing::info!(handles = handles.len(), "starting enumeration");

    tauri::async_runtime::spawn(async move {
        let observer = EventObserver::new(app.clone());
        match enumerator.run(handles, &observer).await {
            Ok(report) => {
                let event = RunCompleteEvent::from_report(&report);
                *last_report.lock().await = Some(report);
                emit(&app, RUN_COMPLETE_EVENT, event);
            }
            Err(e) => {
                tracing::error!(error = %e, "enumeration failed");
                emit(
                    &app,
                    RUN_ERROR_EVENT,
                    RunErrorEvent {
                        error: e.to_string(),
                    },
                );
            }
        }
        *active.lock().await = None;
    });

    Ok(())
}

/// Ask the active run to stop before its next remote call
///
/// # Returns
/// `true` if a run was active
#[tauri::command]
pub async fn cancel_enumeration(state: State<'_, EnumeratorState>) -> Result<bool, String> {
    let active = state.active.lock().await;
    match active.as_ref() {
        Some(cancel) => {
            tracing::info!("cancelling enumeration");
            cancel.cancel();
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Report of the last finished run, or null before the first one
#[tauri::command]
pub async fn last_report(state: State<'_, EnumeratorState>) -> Result<Option<RunReport>, String> {
    Ok(state.last_report.lock().await.clone())
}

/// Export the last run's rows, one file per selected channel
///
/// # Arguments
/// * `selected` - Channel names to export
/// * `format` - `csv` or `json`
/// * `directory` - Destination directory, created if missing
///
/// # Errors
/// Returns error message as String if there is nothing to export, a run
/// is still active, or the request is invalid
#[tauri::command]
pub async fn export_channels(
    state: State<'_, EnumeratorState>,
    selected: Vec<String>,
    format: String,
    directory: String,
) -> Result<ExportSummary, String> {
    let request = export_request(selected, &format, directory).map_err(|e| e.to_string())?;
    state.export_last_report(&request).await
}

fn validate_handles(handles: &[String]) -> Result<(), UploadsError> {
    if handles.iter().any(|h| ChannelHandle::parse(h).is_some()) {
        Ok(())
    } else {
        Err(UploadsError::InputInvalid(
            "At least one channel handle is required".to_string(),
        ))
    }
}

fn export_request(
    selected: Vec<String>,
    format: &str,
    directory: String,
) -> Result<ExportRequest, UploadsError> {
    let format: ExportFormat = format.parse()?;
    if directory.trim().is_empty() {
        return Err(UploadsError::InputInvalid(
            "Export directory is required".to_string(),
        ));
    }
    Ok(ExportRequest {
        selected,
        format,
        directory: PathBuf::from(directory),
    })
}
