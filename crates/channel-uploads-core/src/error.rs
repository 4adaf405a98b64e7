//! Error types for channel upload enumeration
//!
//! One enum covers remote failures, per-channel domain failures and export
//! failures. It serializes as its display string for Tauri commands.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all enumeration and export operations
#[derive(Error, Debug)]
pub enum UploadsError {
    /// Missing credential or no usable channel handles
    #[error("Invalid input: {0}")]
    InputInvalid(String),

    /// HTTP request failed before a status was received (timeout, DNS, TLS...)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limited by the platform (HTTP 429 or a rate-limit 403)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Platform answered with a 5xx status
    #[error("Server error: HTTP {0}")]
    ServerError(u16),

    /// Platform refused the request and retrying will not help
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Remote resource does not exist (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Handle lookup returned no channel
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// Channel exists but its uploads playlist could not be determined
    #[error("Channel data unavailable: {0}")]
    ChannelDataUnavailable(String),

    /// Uploads playlist does not exist
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// Writing one export file failed
    #[error("Failed to write {path}: {reason}")]
    ExportWrite { path: String, reason: String },

    /// Local I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Run was cancelled before this operation could finish
    #[error("Run cancelled")]
    Cancelled,
}

impl UploadsError {
    /// Whether a retry of the same call can reasonably succeed
    ///
    /// Rate limits, 5xx answers, timeouts and connection failures are
    /// transient; everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            UploadsError::RateLimited | UploadsError::ServerError(_) => true,
            UploadsError::HttpError(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().map(|s| s.is_server_error()).unwrap_or(false)
            }
            _ => false,
        }
    }
}

impl Serialize for UploadsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for enumeration operations
pub type Result<T> = std::result::Result<T, UploadsError>;
