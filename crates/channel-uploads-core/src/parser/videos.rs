//! `videos.list` response parser

use serde::Deserialize;

use crate::error::{Result, UploadsError};
use crate::types::VideoMetadata;

#[derive(Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Deserialize)]
struct Video {
    id: String,
    snippet: Option<VideoSnippet>,
}

#[derive(Deserialize)]
struct VideoSnippet {
    #[serde(default)]
    title: String,
}

/// Parses a batch of video snippets, in response order
///
/// Videos returned without a snippet are dropped.
pub fn parse_video_metadata(body: &str) -> Result<Vec<VideoMetadata>> {
    let response: VideoListResponse = serde_json::from_str(body)
        .map_err(|e| UploadsError::ParseError(format!("videos response: {}", e)))?;

    Ok(response
        .items
        .into_iter()
        .filter_map(|video| {
            video.snippet.map(|snippet| VideoMetadata {
                id: video.id,
                title: snippet.title,
            })
        })
        .collect())
}
