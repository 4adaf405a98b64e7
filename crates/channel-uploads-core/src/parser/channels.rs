//! `channels.list` response parser
//!
//! Used twice per channel: once with `part=id&forHandle=` to resolve a
//! handle, once with `part=contentDetails&id=` to find the uploads playlist.
//! The platform omits `items` entirely when nothing matches.

use serde::Deserialize;

use crate::error::{Result, UploadsError};
use crate::types::ChannelDetails;

#[derive(Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Deserialize)]
struct ChannelItem {
    id: String,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
}

#[derive(Deserialize)]
struct ContentDetails {
    #[serde(rename = "relatedPlaylists")]
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

fn parse_list(body: &str) -> Result<ChannelListResponse> {
    serde_json::from_str(body)
        .map_err(|e| UploadsError::ParseError(format!("channels response: {}", e)))
}

/// Extracts the channel ID from a handle lookup response
///
/// # Returns
/// `Some(id)` for the first matching channel, `None` if nothing matched
pub fn parse_channel_id(body: &str) -> Result<Option<String>> {
    let response = parse_list(body)?;
    Ok(response
        .items
        .into_iter()
        .map(|item| item.id)
        .find(|id| !id.is_empty()))
}

/// Extracts content details from a channel details response
///
/// # Returns
/// `None` if the channel does not exist. A channel without an uploads
/// playlist yields `ChannelDetails { uploads_playlist_id: None }`.
pub fn parse_channel_details(body: &str) -> Result<Option<ChannelDetails>> {
    let response = parse_list(body)?;
    Ok(response.items.into_iter().next().map(|item| {
        let uploads_playlist_id = item
            .content_details
            .and_then(|details| details.related_playlists)
            .and_then(|playlists| playlists.uploads)
            .filter(|id| !id.is_empty());
        ChannelDetails { uploads_playlist_id }
    }))
}
