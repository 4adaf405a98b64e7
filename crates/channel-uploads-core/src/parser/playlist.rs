//! `playlistItems.list` response parser

use serde::Deserialize;

use crate::error::{Result, UploadsError};
use crate::types::{PageCursor, PlaylistItems};

#[derive(Deserialize)]
struct PlaylistItemListResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(rename = "pageInfo")]
    page_info: Option<PageInfo>,
}

#[derive(Deserialize)]
struct PageInfo {
    #[serde(rename = "totalResults", default)]
    total_results: u64,
}

#[derive(Deserialize)]
struct PlaylistItem {
    #[serde(rename = "contentDetails")]
    content_details: Option<PlaylistItemContentDetails>,
}

#[derive(Deserialize)]
struct PlaylistItemContentDetails {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

/// Parses one page of playlist items
///
/// Items without a video ID are skipped. An empty `nextPageToken` is
/// treated the same as a missing one.
pub fn parse_playlist_items(body: &str) -> Result<PlaylistItems> {
    let response: PlaylistItemListResponse = serde_json::from_str(body)
        .map_err(|e| UploadsError::ParseError(format!("playlistItems response: {}", e)))?;

    let video_ids = response
        .items
        .into_iter()
        .filter_map(|item| item.content_details.and_then(|details| details.video_id))
        .filter(|id| !id.is_empty())
        .collect();

    Ok(PlaylistItems {
        total_results: response.page_info.map(|info| info.total_results).unwrap_or(0),
        video_ids,
        next_cursor: response
            .next_page_token
            .filter(|token| !token.is_empty())
            .map(PageCursor::new),
    })
}
