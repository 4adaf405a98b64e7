//! Core data types for channel enumeration
//!
//! Contains the values threaded between the resolver, paginator, batcher
//! and orchestrator, plus the rows and outcomes a run produces.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of a platform channel ID (`UC` followed by 22 characters)
const CHANNEL_ID_LEN: usize = 24;

/// How a [`ChannelHandle`] is looked up on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    /// Human-readable `@handle`, needs a lookup to become a channel ID
    Handle,
    /// Raw channel ID, usable as-is
    ChannelId,
}

/// A user-supplied channel reference, normalized
///
/// Whitespace is trimmed and a leading `@` sigil is dropped from the
/// display form, so `" @Alpha "` displays as `Alpha`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelHandle {
    display: String,
    kind: HandleKind,
}

impl ChannelHandle {
    /// Normalize raw input, returning `None` for blank input
    ///
    /// # Example
    /// ```
    /// use channel_uploads_core::{ChannelHandle, HandleKind};
    /// let handle = ChannelHandle::parse("  @Alpha ").unwrap();
    /// assert_eq!(handle.as_str(), "Alpha");
    /// assert_eq!(handle.kind(), HandleKind::Handle);
    /// assert!(ChannelHandle::parse("   ").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let (name, kind) = match trimmed.strip_prefix('@') {
            Some(rest) => (rest.trim(), HandleKind::Handle),
            None if looks_like_channel_id(trimmed) => (trimmed, HandleKind::ChannelId),
            None => (trimmed, HandleKind::Handle),
        };

        if name.is_empty() {
            return None;
        }

        Some(Self {
            display: name.to_string(),
            kind,
        })
    }

    /// Display form, without the `@` sigil
    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Form sent to the handle lookup endpoint
    pub fn query_form(&self) -> String {
        format!("@{}", self.display)
    }
}

impl fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

fn looks_like_channel_id(value: &str) -> bool {
    value.len() == CHANNEL_ID_LEN
        && value.starts_with("UC")
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Resolved identifiers for one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIdentity {
    pub channel_id: String,
    pub uploads_playlist_id: String,
}

/// Channel fields returned by the details lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelDetails {
    /// `None` when the platform omitted the related uploads playlist
    pub uploads_playlist_id: Option<String>,
}

/// Opaque continuation token for the next playlist page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One raw page of a playlist, as returned by the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistItems {
    /// Total number of items the platform reports for the whole playlist
    pub total_results: u64,
    /// Video IDs on this page, in playlist order
    pub video_ids: Vec<String>,
    /// `None` on the last page
    pub next_cursor: Option<PageCursor>,
}

/// A video's place in its playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub video_id: String,
    /// 0-based index across the whole playlist
    pub position: u64,
}

/// One page produced by the paginator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistPage {
    pub total_results: u64,
    pub items: Vec<VideoRef>,
    pub next_cursor: Option<PageCursor>,
}

/// Display metadata for a single video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
}

/// The unit of output: one uploaded video of one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRow {
    /// Channel display form (no `@`)
    pub channel: String,
    pub title: String,
    pub url: String,
}

/// Per-channel stage where a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStage {
    Resolving,
    Paginating,
}

/// How one channel ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChannelOutcome {
    Success { rows: usize },
    Failure { stage: ChannelStage, reason: String },
}

impl ChannelOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ChannelOutcome::Success { .. })
    }
}

/// Outcome of one channel within a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub channel: String,
    #[serde(flatten)]
    pub outcome: ChannelOutcome,
}
