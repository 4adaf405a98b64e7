//! Channel handle resolution
//!
//! Turns a normalized [`ChannelHandle`] into the channel ID and uploads
//! playlist ID the paginator needs. Both remote calls go through the
//! retry policy; "no match" outcomes are permanent and never retried.

use crate::error::{Result, UploadsError};
use crate::gateway::RemoteGateway;
use crate::retry::RetryPolicy;
use crate::types::{ChannelHandle, ChannelIdentity, HandleKind};

/// Resolve one channel handle
///
/// # Errors
/// - `ChannelNotFound` if the handle (or raw channel ID) matches no channel
/// - `ChannelDataUnavailable` if the channel has no uploads playlist
/// - any transient error once the retry policy gives up
#[tracing::instrument(level = "debug", skip_all, fields(channel = %handle))]
pub async fn resolve_channel<G>(
    gateway: &G,
    retry: &RetryPolicy,
    handle: &ChannelHandle,
) -> Result<ChannelIdentity>
where
    G: RemoteGateway + ?Sized,
{
    let not_found = || UploadsError::ChannelNotFound(handle.to_string());

    let channel_id = match handle.kind() {
        HandleKind::ChannelId => handle.as_str().to_string(),
        HandleKind::Handle => {
            let query = handle.query_form();
            retry
                .execute("resolve_handle", || gateway.resolve_handle(&query))
                .await
                .map_err(|e| match e {
                    UploadsError::NotFound(_) => not_found(),
                    other => other,
                })?
                .ok_or_else(not_found)?
        }
    };

    let details = retry
        .execute("channel_details", || gateway.channel_details(&channel_id))
        .await
        .map_err(|e| match e {
            UploadsError::NotFound(_) => not_found(),
            other => other,
        })?;

    let uploads_playlist_id = match details {
        Some(details) => details.uploads_playlist_id,
        // A handle that resolved but then vanished is a data problem; an
        // unknown raw ID simply does not exist.
        None if handle.kind() == HandleKind::ChannelId => return Err(not_found()),
        None => None,
    }
    .ok_or_else(|| UploadsError::ChannelDataUnavailable(handle.to_string()))?;

    tracing::debug!(%channel_id, %uploads_playlist_id, "resolved");
    Ok(ChannelIdentity {
        channel_id,
        uploads_playlist_id,
    })
}
