//! Cursor-threaded playlist pagination
//!
//! [`PlaylistPaginator`] fetches one page per call to
//! [`next_page`](PlaylistPaginator::next_page), carrying the previous
//! page's cursor forward. Nothing is prefetched: the caller consumes each
//! page before asking for the next.

use crate::error::{Result, UploadsError};
use crate::gateway::RemoteGateway;
use crate::retry::RetryPolicy;
use crate::types::{PageCursor, PlaylistPage, VideoRef};

/// Items requested per page; the platform's per-call maximum
pub const PAGE_SIZE: u32 = 50;

/// Lazy, finite sequence of pages for one playlist
pub struct PlaylistPaginator<'a, G: ?Sized> {
    gateway: &'a G,
    retry: &'a RetryPolicy,
    playlist_id: String,
    cursor: Option<PageCursor>,
    position: u64,
    finished: bool,
}

impl<'a, G> PlaylistPaginator<'a, G>
where
    G: RemoteGateway + ?Sized,
{
    /// Start at the first page of a playlist
    pub fn new(gateway: &'a G, retry: &'a RetryPolicy, playlist_id: impl Into<String>) -> Self {
        Self {
            gateway,
            retry,
            playlist_id: playlist_id.into(),
            cursor: None,
            position: 0,
            finished: false,
        }
    }

    /// Continue from a cursor obtained earlier
    ///
    /// # Arguments
    /// * `cursor` - Cursor of the page to fetch next
    /// * `position` - Playlist position of that page's first item
    pub fn resume(
        gateway: &'a G,
        retry: &'a RetryPolicy,
        playlist_id: impl Into<String>,
        cursor: PageCursor,
        position: u64,
    ) -> Self {
        Self {
            cursor: Some(cursor),
            position,
            ..Self::new(gateway, retry, playlist_id)
        }
    }

    pub fn playlist_id(&self) -> &str {
        &self.playlist_id
    }

    /// Cursor the next call will send, `None` before the first page
    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fetch the next page, `None` once the last page has been returned
    ///
    /// On error the cursor is left untouched, so calling again retries
    /// the same page.
    ///
    /// # Errors
    /// - `PlaylistNotFound` if the playlist does not exist (never retried)
    /// - any transient error once the retry policy gives up
    pub async fn next_page(&mut self) -> Result<Option<PlaylistPage>> {
        if self.finished {
            return Ok(None);
        }

        let gateway = self.gateway;
        let playlist_id = self.playlist_id.as_str();
        let cursor = self.cursor.as_ref();

        let items = self
            .retry
            .execute("list_playlist_page", || {
                gateway.list_playlist_page(playlist_id, cursor, PAGE_SIZE)
            })
            .await
            .map_err(|e| match e {
                UploadsError::NotFound(_) => UploadsError::PlaylistNotFound(playlist_id.to_string()),
                other => other,
            })?;

        let start = self.position;
        let refs: Vec<VideoRef> = items
            .video_ids
            .into_iter()
            .enumerate()
            .map(|(i, video_id)| VideoRef {
                video_id,
                position: start + i as u64,
            })
            .collect();

        tracing::debug!(
            playlist = %self.playlist_id,
            items = refs.len(),
            total = items.total_results,
            has_next = items.next_cursor.is_some(),
            "page fetched"
        );

        self.position += refs.len() as u64;
        self.cursor = items.next_cursor.clone();
        self.finished = self.cursor.is_none();

        Ok(Some(PlaylistPage {
            total_results: items.total_results,
            items: refs,
            next_cursor: items.next_cursor,
        }))
    }
}
