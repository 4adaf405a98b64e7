//! Remote API gateway seam
//!
//! The pipeline talks to the platform only through [`RemoteGateway`]. Each
//! method maps onto exactly one remote list call and performs no retries of
//! its own; retrying is the caller's job (see [`crate::RetryPolicy`]).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChannelDetails, PageCursor, PlaylistItems, VideoMetadata};

#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Resolve an `@handle` to a channel ID, `None` if no channel matches
    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>>;

    /// Fetch content details of a channel, `None` if the channel does not exist
    async fn channel_details(&self, channel_id: &str) -> Result<Option<ChannelDetails>>;

    /// Fetch one page of a playlist
    async fn list_playlist_page(
        &self,
        playlist_id: &str,
        cursor: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<PlaylistItems>;

    /// Fetch titles for up to 50 videos in one round trip
    async fn video_metadata(&self, video_ids: &[String]) -> Result<Vec<VideoMetadata>>;
}
