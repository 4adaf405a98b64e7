//! Batched video metadata lookup
//!
//! One metadata call per page of video refs. Output follows the order of
//! the response; requested IDs the platform does not return (private or
//! deleted videos) are dropped with a warning.

use std::collections::HashSet;

use crate::error::Result;
use crate::gateway::RemoteGateway;
use crate::retry::RetryPolicy;
use crate::types::VideoRef;
use crate::url::build_video_url;

/// Most IDs the platform accepts in one metadata call
pub const MAX_BATCH_SIZE: usize = 50;

/// Title and watch URL of one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub url: String,
}

/// Fetch titles for a page of video refs
///
/// Issues one call per [`MAX_BATCH_SIZE`] refs (one call for a normal
/// page) and none at all for an empty page.
pub async fn fetch_metadata<G>(
    gateway: &G,
    retry: &RetryPolicy,
    refs: &[VideoRef],
) -> Result<Vec<VideoSummary>>
where
    G: RemoteGateway + ?Sized,
{
    let mut summaries = Vec::with_capacity(refs.len());

    for chunk in refs.chunks(MAX_BATCH_SIZE) {
        let ids: Vec<String> = chunk.iter().map(|r| r.video_id.clone()).collect();
        let metadata = retry
            .execute("video_metadata", || gateway.video_metadata(&ids))
            .await?;

        let requested: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut returned: HashSet<String> = HashSet::with_capacity(metadata.len());

        for video in metadata {
            if !requested.contains(video.id.as_str()) {
                tracing::debug!(video_id = %video.id, "ignoring video that was not requested");
                continue;
            }
            returned.insert(video.id.clone());
            summaries.push(VideoSummary {
                url: build_video_url(&video.id),
                video_id: video.id,
                title: video.title,
            });
        }

        let missing: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| !returned.contains(*id))
            .collect();
        if !missing.is_empty() {
            tracing::warn!(count = missing.len(), ids = ?missing, "metadata missing, videos skipped");
        }
    }

    Ok(summaries)
}
