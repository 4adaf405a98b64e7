//! Channel enumeration orchestrator
//!
//! Drives the resolver, paginator and batcher for each handle, in input
//! order and strictly one remote call at a time. Per channel:
//!
//! ```text
//! Idle -> Resolving -> Paginating -> Done
//!            |             |
//!            +-> Failed <--+
//! ```
//!
//! A failed channel is recorded and reported, and the run moves on to the
//! next handle. Only invalid input or cancellation stop a run early.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::batcher::fetch_metadata;
use crate::client::{ClientConfig, YouTubeClient};
use crate::error::{Result, UploadsError};
use crate::gateway::RemoteGateway;
use crate::observer::RunObserver;
use crate::paginator::PlaylistPaginator;
use crate::progress::{ProgressTracker, RunProgress};
use crate::resolver::resolve_channel;
use crate::retry::RetryPolicy;
use crate::types::{ChannelHandle, ChannelOutcome, ChannelReport, ChannelStage, VideoRow};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every handle reached `Done` or `Failed`
    Complete,
    /// Stopped by the cancellation token; later handles were not started
    Cancelled,
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Append-only row log, in emission order
    pub rows: Vec<VideoRow>,
    /// One entry per handle that was started, in input order
    pub outcomes: Vec<ChannelReport>,
    pub progress: RunProgress,
    pub status: RunStatus,
}

impl RunReport {
    /// Export is possible as soon as any row exists, whatever failed
    pub fn can_export(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn rows_for<'a>(&'a self, channel: &'a str) -> impl Iterator<Item = &'a VideoRow> + 'a {
        self.rows.iter().filter(move |row| row.channel == channel)
    }

    /// Channels that were resolved and paginated to the end
    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|report| report.outcome.is_success())
            .map(|report| report.channel.as_str())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ChannelReport> {
        self.outcomes
            .iter()
            .filter(|report| !report.outcome.is_success())
    }
}

struct ChannelFailure {
    stage: ChannelStage,
    error: UploadsError,
}

/// Rows and progress shared by every channel of one run
struct RowLog {
    rows: Vec<VideoRow>,
    tracker: ProgressTracker,
}

/// Enumerates uploads for a list of channel handles
///
/// # Example
///
/// ```no_run
/// # async fn example() -> channel_uploads_core::Result<()> {
/// use channel_uploads_core::ChannelEnumerator;
/// let enumerator = ChannelEnumerator::new("my-api-key")?;
/// let report = enumerator.run(["@Alpha", "@Beta"], &()).await?;
/// for row in &report.rows {
///     println!("{}: {} {}", row.channel, row.title, row.url);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ChannelEnumerator<G> {
    gateway: G,
    retry: RetryPolicy,
}

impl ChannelEnumerator<YouTubeClient> {
    /// Create an enumerator backed by the YouTube Data API with default settings
    ///
    /// # Errors
    /// Returns `InputInvalid` if the API key is blank
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key), RetryPolicy::default())
    }

    /// Create an enumerator with custom client and retry configuration
    pub fn with_config(config: ClientConfig, retry: RetryPolicy) -> Result<Self> {
        let client = YouTubeClient::with_config(config)?;
        Ok(Self::with_gateway(client, retry))
    }
}

impl<G> ChannelEnumerator<G>
where
    G: RemoteGateway,
{
    pub fn with_gateway(gateway: G, retry: RetryPolicy) -> Self {
        Self { gateway, retry }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Token that cancels the run before its next remote call
    pub fn cancellation(&self) -> &CancellationToken {
        self.retry.cancellation()
    }

    /// Enumerate every upload of every handle
    ///
    /// Handles are trimmed and stripped of their `@`; blank and duplicate
    /// entries are skipped, first occurrence wins.
    ///
    /// # Errors
    /// Returns `InputInvalid`, before any remote call, if no usable handle
    /// remains. Per-channel failures are never returned here; they are
    /// recorded in [`RunReport::outcomes`] and sent to the observer.
    pub async fn run<I, S, O>(&self, handles: I, observer: &O) -> Result<RunReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        O: RunObserver + ?Sized,
    {
        let handles: Vec<ChannelHandle> = handles
            .into_iter()
            .filter_map(|raw| ChannelHandle::parse(raw.as_ref()))
            .collect();
        if handles.is_empty() {
            return Err(UploadsError::InputInvalid(
                "At least one channel handle is required".to_string(),
            ));
        }

        let mut processed: HashSet<&str> = HashSet::with_capacity(handles.len());
        let mut log = RowLog {
            rows: Vec::new(),
            tracker: ProgressTracker::new(),
        };
        let mut outcomes = Vec::with_capacity(handles.len());
        let mut status = RunStatus::Complete;

        for handle in &handles {
            if !processed.insert(handle.as_str()) {
                tracing::debug!(channel = %handle, "duplicate handle skipped");
                continue;
            }
            if self.retry.is_cancelled() {
                status = RunStatus::Cancelled;
                break;
            }

            let outcome = match self.enumerate_channel(handle, &mut log, observer).await {
                Ok(rows) => {
                    tracing::info!(channel = %handle, rows, "channel complete");
                    ChannelOutcome::Success { rows }
                }
                Err(failure) => {
                    tracing::warn!(
                        channel = %handle,
                        stage = ?failure.stage,
                        error = %failure.error,
                        "channel failed"
                    );
                    if matches!(failure.error, UploadsError::Cancelled) {
                        status = RunStatus::Cancelled;
                    }
                    observer.on_channel_failed(handle, &failure.error);
                    ChannelOutcome::Failure {
                        stage: failure.stage,
                        reason: failure.error.to_string(),
                    }
                }
            };
            outcomes.push(ChannelReport {
                channel: handle.to_string(),
                outcome,
            });

            if status == RunStatus::Cancelled {
                break;
            }
        }

        let progress = log.tracker.snapshot();
        tracing::info!(
            rows = log.rows.len(),
            channels = outcomes.len(),
            ?status,
            "run finished"
        );
        observer.on_run_complete(status);

        Ok(RunReport {
            rows: log.rows,
            outcomes,
            progress,
            status,
        })
    }

    #[tracing::instrument(level = "info", skip_all, fields(channel = %handle))]
    async fn enumerate_channel<O>(
        &self,
        handle: &ChannelHandle,
        log: &mut RowLog,
        observer: &O,
    ) -> std::result::Result<usize, ChannelFailure>
    where
        O: RunObserver + ?Sized,
    {
        let identity = resolve_channel(&self.gateway, &self.retry, handle)
            .await
            .map_err(|error| ChannelFailure {
                stage: ChannelStage::Resolving,
                error,
            })?;
        observer.on_channel_started(handle);

        let paginating = |error: UploadsError| ChannelFailure {
            stage: ChannelStage::Paginating,
            error,
        };
        let mut paginator =
            PlaylistPaginator::new(&self.gateway, &self.retry, identity.uploads_playlist_id);
        let mut seen: HashSet<String> = HashSet::new();
        let mut first_page = true;
        let mut emitted = 0;

        while let Some(page) = paginator.next_page().await.map_err(paginating)? {
            if first_page {
                log.tracker.add_channel_estimate(page.total_results);
                first_page = false;
            }

            let videos = fetch_metadata(&self.gateway, &self.retry, &page.items)
                .await
                .map_err(paginating)?;

            for video in videos {
                if !seen.insert(video.video_id.clone()) {
                    tracing::debug!(video_id = %video.video_id, "duplicate video skipped");
                    continue;
                }

                let row = VideoRow {
                    channel: handle.to_string(),
                    title: video.title,
                    url: video.url,
                };
                observer.on_row_emitted(&row);
                log.rows.push(row);
                observer.on_progress(log.tracker.record_row());
                emitted += 1;
            }
        }

        Ok(emitted)
    }
}
