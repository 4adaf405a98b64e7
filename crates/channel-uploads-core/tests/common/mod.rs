//! Scripted in-memory gateway and recording observer shared by the
//! integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use channel_uploads_core::{
    ChannelDetails, ChannelHandle, PageCursor, PlaylistItems, RemoteGateway, Result, RetryPolicy,
    RunObserver, RunStatus, UploadsError, VideoMetadata, VideoRow,
};

/// Failure a scripted call produces
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Transient,
    NotFound,
}

impl Failure {
    fn into_error(self, what: &str) -> UploadsError {
        match self {
            Failure::Transient => UploadsError::ServerError(503),
            Failure::NotFound => UploadsError::NotFound(what.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Page(PlaylistItems),
    Fail(Failure),
}

type PageKey = (String, Option<String>);

#[derive(Default)]
pub struct FakeGateway {
    handles: HashMap<String, String>,
    channels: HashMap<String, ChannelDetails>,
    pages: Mutex<HashMap<PageKey, VecDeque<Scripted>>>,
    titles: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `@handle -> channel_id -> uploads playlist`
    pub fn with_channel(mut self, handle: &str, channel_id: &str, playlist_id: &str) -> Self {
        self.handles
            .insert(format!("@{handle}"), channel_id.to_string());
        self.channels.insert(
            channel_id.to_string(),
            ChannelDetails {
                uploads_playlist_id: Some(playlist_id.to_string()),
            },
        );
        self
    }

    /// Register a handle whose channel has no uploads playlist field
    pub fn with_channel_without_uploads(mut self, handle: &str, channel_id: &str) -> Self {
        self.handles
            .insert(format!("@{handle}"), channel_id.to_string());
        self.channels
            .insert(channel_id.to_string(), ChannelDetails::default());
        self
    }

    /// Append a successful page response for `(playlist, cursor)`
    pub fn with_page(
        self,
        playlist_id: &str,
        cursor: Option<&str>,
        total: u64,
        video_ids: &[&str],
        next: Option<&str>,
    ) -> Self {
        let page = PlaylistItems {
            total_results: total,
            video_ids: video_ids.iter().map(|id| id.to_string()).collect(),
            next_cursor: next.map(PageCursor::new),
        };
        self.script(playlist_id, cursor, Scripted::Page(page))
    }

    /// Append a failing page response for `(playlist, cursor)`
    pub fn with_page_failure(self, playlist_id: &str, cursor: Option<&str>, failure: Failure) -> Self {
        self.script(playlist_id, cursor, Scripted::Fail(failure))
    }

    pub fn with_video(mut self, video_id: &str, title: &str) -> Self {
        self.titles.insert(video_id.to_string(), title.to_string());
        self
    }

    fn script(self, playlist_id: &str, cursor: Option<&str>, response: Scripted) -> Self {
        self.pages
            .lock()
            .unwrap()
            .entry((playlist_id.to_string(), cursor.map(str::to_string)))
            .or_default()
            .push_back(response);
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>> {
        self.record(format!("resolve:{handle}"));
        Ok(self.handles.get(handle).cloned())
    }

    async fn channel_details(&self, channel_id: &str) -> Result<Option<ChannelDetails>> {
        self.record(format!("details:{channel_id}"));
        Ok(self.channels.get(channel_id).cloned())
    }

    async fn list_playlist_page(
        &self,
        playlist_id: &str,
        cursor: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<PlaylistItems> {
        let cursor = cursor.map(|c| c.as_str().to_string());
        self.record(format!(
            "page:{playlist_id}:{}:{page_size}",
            cursor.as_deref().unwrap_or("-")
        ));

        let mut pages = self.pages.lock().unwrap();
        let queue = pages
            .get_mut(&(playlist_id.to_string(), cursor))
            .ok_or_else(|| UploadsError::NotFound(playlist_id.to_string()))?;
        // The last scripted response repeats forever
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        match response {
            Some(Scripted::Page(page)) => Ok(page),
            Some(Scripted::Fail(failure)) => Err(failure.into_error(playlist_id)),
            None => Err(UploadsError::NotFound(playlist_id.to_string())),
        }
    }

    async fn video_metadata(&self, video_ids: &[String]) -> Result<Vec<VideoMetadata>> {
        self.record(format!("videos:{}", video_ids.join(",")));
        Ok(video_ids
            .iter()
            .filter_map(|id| {
                self.titles.get(id).map(|title| VideoMetadata {
                    id: id.clone(),
                    title: title.clone(),
                })
            })
            .collect())
    }
}

/// Retry policy with the default attempt count but millisecond waits
pub fn fast_retry() -> RetryPolicy {
    let mut policy = RetryPolicy::default();
    policy.multiplier = Duration::from_millis(1);
    policy.min_wait = Duration::from_millis(1);
    policy.max_wait = Duration::from_millis(5);
    policy
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(String),
    Row(VideoRow),
    Progress(u8),
    Failed(String, String),
    Complete(RunStatus),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn started(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Started(channel) => Some(channel),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Progress(percent) => Some(percent),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Failed(channel, reason) => Some((channel, reason)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl RunObserver for RecordingObserver {
    fn on_channel_started(&self, channel: &ChannelHandle) {
        self.push(Event::Started(channel.to_string()));
    }

    fn on_row_emitted(&self, row: &VideoRow) {
        self.push(Event::Row(row.clone()));
    }

    fn on_progress(&self, percent: u8) {
        self.push(Event::Progress(percent));
    }

    fn on_channel_failed(&self, channel: &ChannelHandle, error: &UploadsError) {
        self.push(Event::Failed(channel.to_string(), error.to_string()));
    }

    fn on_run_complete(&self, status: RunStatus) {
        self.push(Event::Complete(status));
    }
}
