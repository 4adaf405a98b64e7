//! JSON response parsers for the YouTube Data API
//!
//! Contains modules for parsing each list response the gateway consumes,
//! plus the error envelope returned with non-2xx statuses.

pub mod api_error;
pub mod channels;
pub mod playlist;
pub mod videos;

pub use api_error::{ApiErrorDetails, parse_api_error};
pub use channels::{parse_channel_details, parse_channel_id};
pub use playlist::parse_playlist_items;
pub use videos::parse_video_metadata;
