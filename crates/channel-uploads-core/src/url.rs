//! URL helper functions for the YouTube Data API
//!
//! Builds the request paths for the four list calls the gateway makes
//! and the public watch URL emitted for each video. Paths are relative to
//! the configured API base URL and never include the API key.

/// Default base URL of the YouTube Data API v3
pub const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Builds the public watch URL for a video
///
/// # Example
/// ```
/// use channel_uploads_core::url::build_video_url;
/// assert_eq!(build_video_url("dQw4w9WgXcQ"), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
/// ```
pub fn build_video_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}

/// Path resolving an `@handle` to a channel ID
///
/// # Example
/// ```
/// use channel_uploads_core::url::build_handle_lookup_path;
/// assert_eq!(build_handle_lookup_path("@Alpha"), "/channels?part=id&forHandle=%40Alpha");
/// ```
pub fn build_handle_lookup_path(handle: &str) -> String {
    format!("/channels?part=id&forHandle={}", urlencoding::encode(handle))
}

/// Path fetching a channel's content details (uploads playlist)
pub fn build_channel_details_path(channel_id: &str) -> String {
    format!(
        "/channels?part=contentDetails&id={}",
        urlencoding::encode(channel_id)
    )
}

/// Path for one page of a playlist
///
/// # Arguments
/// * `playlist_id` - Uploads playlist ID
/// * `cursor` - Page token from the previous page, `None` for the first page
/// * `page_size` - Items per page, at most 50
pub fn build_playlist_items_path(playlist_id: &str, cursor: Option<&str>, page_size: u32) -> String {
    let mut path = format!(
        "/playlistItems?part=contentDetails&playlistId={}&maxResults={}",
        urlencoding::encode(playlist_id),
        page_size
    );
    if let Some(token) = cursor {
        path.push_str("&pageToken=");
        path.push_str(&urlencoding::encode(token));
    }
    path
}

/// Path fetching snippets for a batch of videos
pub fn build_videos_path(video_ids: &[String]) -> String {
    format!(
        "/videos?part=snippet&id={}",
        urlencoding::encode(&video_ids.join(","))
    )
}
