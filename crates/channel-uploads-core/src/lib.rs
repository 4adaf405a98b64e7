//! Channel Uploads Core Library
//!
//! Enumerates every uploaded video of a set of YouTube channels and
//! exports the result per channel.
//!
//! # Overview
//!
//! For each channel handle the pipeline:
//! - resolves the handle to a channel ID and its uploads playlist
//! - pages through the playlist 50 items at a time, following cursors
//! - fetches titles for each page in one batched call
//! - emits one [`VideoRow`] per video and reports progress
//!
//! Every remote call is wrapped in a [`RetryPolicy`] (3 attempts, bounded
//! exponential backoff). A channel that fails is recorded and skipped; the
//! run always continues with the next handle.
//!
//! # Example
//!
//! ```no_run
//! use channel_uploads_core::{ChannelEnumerator, ExportFormat, ExportRequest, Result, export_rows};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let enumerator = ChannelEnumerator::new("my-api-key")?;
//!     let report = enumerator.run(["@Alpha", "@Beta"], &()).await?;
//!
//!     for failure in report.failures() {
//!         eprintln!("{} failed: {:?}", failure.channel, failure.outcome);
//!     }
//!
//!     if report.can_export() {
//!         let request = ExportRequest {
//!             selected: report.succeeded().map(str::to_string).collect(),
//!             format: ExportFormat::Csv,
//!             directory: "out".into(),
//!         };
//!         export_rows(&report.rows, &request)?;
//!     }
//!     Ok(())
//! }
//! ```

mod batcher;
mod client;
mod error;
mod export;
mod gateway;
mod observer;
mod orchestrator;
mod paginator;
pub mod parser;
mod progress;
mod resolver;
mod retry;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, YouTubeClient};

// Re-export error types
pub use error::{Result, UploadsError};

// Re-export pipeline stages
pub use batcher::{MAX_BATCH_SIZE, VideoSummary, fetch_metadata};
pub use gateway::RemoteGateway;
pub use paginator::{PAGE_SIZE, PlaylistPaginator};
pub use resolver::resolve_channel;
pub use retry::RetryPolicy;

// Re-export run API
pub use observer::RunObserver;
pub use orchestrator::{ChannelEnumerator, RunReport, RunStatus};
pub use progress::{ProgressTracker, RunProgress};

// Re-export export API
pub use export::{
    ExportFailure, ExportFormat, ExportRequest, ExportSummary, ExportedVideo, export_rows,
    group_rows, output_file_name, read_export, sanitize_file_stem,
};

// Re-export data types
pub use types::{
    ChannelDetails, ChannelHandle, ChannelIdentity, ChannelOutcome, ChannelReport, ChannelStage,
    HandleKind, PageCursor, PlaylistItems, PlaylistPage, VideoMetadata, VideoRef, VideoRow,
};

// Cancellation token type used by `RetryPolicy`
pub use tokio_util::sync::CancellationToken;
