//! HTTP client for the YouTube Data API v3
//!
//! Implements [`RemoteGateway`] over `reqwest`. Each gateway method is a
//! single GET; status codes are mapped onto [`UploadsError`] so the retry
//! policy can tell transient failures from permanent ones.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, UploadsError};
use crate::gateway::RemoteGateway;
use crate::parser::{
    parse_api_error, parse_channel_details, parse_channel_id, parse_playlist_items,
    parse_video_metadata,
};
use crate::types::{ChannelDetails, PageCursor, PlaylistItems, VideoMetadata};
use crate::url::{
    API_BASE_URL, build_channel_details_path, build_handle_lookup_path,
    build_playlist_items_path, build_videos_path,
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key sent with every request (required)
    pub api_key: String,
    /// API base URL (default: the public YouTube Data API v3 endpoint)
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Default configuration with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: API_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// YouTube Data API client
///
/// Holds a pooled `reqwest::Client`; cheap to share by reference for the
/// lifetime of a run.
pub struct YouTubeClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl YouTubeClient {
    /// Create a new client with default configuration and the given API key
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// - `InputInvalid` if the API key is blank
    /// - `HttpError` if the HTTP client cannot be built
    pub fn with_config(mut config: ClientConfig) -> Result<Self> {
        config.api_key = config.api_key.trim().to_string();
        if config.api_key.is_empty() {
            return Err(UploadsError::InputInvalid(
                "API key is required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(UploadsError::HttpError)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform a single GET against the API and return the body
    ///
    /// The key is appended here so that built paths, logs and errors
    /// never contain it.
    async fn get(&self, path: &str) -> Result<String> {
        let url = format!(
            "{}{}&key={}",
            self.config.base_url.trim_end_matches('/'),
            path,
            urlencoding::encode(&self.config.api_key)
        );
        tracing::debug!(path, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UploadsError::HttpError(e.without_url()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .text()
                .await
                .map_err(|e| UploadsError::HttpError(e.without_url()));
        }

        let body = response.text().await.unwrap_or_default();
        let error = classify_status(status.as_u16(), &body, path);
        tracing::debug!(path, status = status.as_u16(), %error, "request failed");
        Err(error)
    }
}

/// Map a non-2xx status and its body onto an error
///
/// 403 is ambiguous on this API: `rateLimitExceeded` clears on its own,
/// `quotaExceeded` does not until the daily reset.
fn classify_status(status: u16, body: &str, path: &str) -> UploadsError {
    let details = parse_api_error(body);
    let reason = details.as_ref().and_then(|d| d.reason.clone());
    let message = details
        .map(|d| d.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| path.to_string());

    match (status, reason.as_deref()) {
        (429, _) => UploadsError::RateLimited,
        (403, Some("rateLimitExceeded" | "userRateLimitExceeded")) => UploadsError::RateLimited,
        (404, _) => UploadsError::NotFound(message),
        (500..=599, _) => UploadsError::ServerError(status),
        _ => UploadsError::Rejected { status, message },
    }
}

#[async_trait]
impl RemoteGateway for YouTubeClient {
    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>> {
        let body = self.get(&build_handle_lookup_path(handle)).await?;
        parse_channel_id(&body)
    }

    async fn channel_details(&self, channel_id: &str) -> Result<Option<ChannelDetails>> {
        let body = self.get(&build_channel_details_path(channel_id)).await?;
        parse_channel_details(&body)
    }

    async fn list_playlist_page(
        &self,
        playlist_id: &str,
        cursor: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<PlaylistItems> {
        let path = build_playlist_items_path(playlist_id, cursor.map(PageCursor::as_str), page_size);
        let body = self.get(&path).await?;
        parse_playlist_items(&body)
    }

    async fn video_metadata(&self, video_ids: &[String]) -> Result<Vec<VideoMetadata>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        let body = self.get(&build_videos_path(video_ids)).await?;
        parse_video_metadata(&body)
    }
}
