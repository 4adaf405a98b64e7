//! Error envelope parser
//!
//! Non-2xx answers carry `{"error": {"code", "message", "errors": [{"reason"}]}}`.
//! The reason distinguishes rate limiting from quota exhaustion on 403s.

use serde::Deserialize;

/// Message and first reason of an API error body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorDetails {
    pub message: String,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Deserialize)]
struct ErrorItem {
    reason: Option<String>,
}

/// Parses an API error body, returning `None` if it is not the standard envelope
pub fn parse_api_error(body: &str) -> Option<ApiErrorDetails> {
    let envelope: Envelope = serde_json::from_str(body).ok()?;
    let reason = envelope
        .error
        .errors
        .into_iter()
        .find_map(|item| item.reason);
    Some(ApiErrorDetails {
        message: envelope.error.message,
        reason,
    })
}
