//! `channel-uploads` command-line front end
//!
//! Enumerates the uploads of the given channels, prints one line per video
//! and optionally exports a file per channel.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};

use channel_uploads_core::{
    ChannelEnumerator, ChannelHandle, ClientConfig, ExportFormat, ExportRequest, RetryPolicy,
    RunObserver, RunReport, RunStatus, UploadsError, VideoRow, export_rows,
};
use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "channel-uploads")]
#[command(version)]
#[command(about = "List every upload of one or more YouTube channels", long_about = None)]
struct Args {
    /// Channel handles, with or without `@`
    handles: Vec<String>,

    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// File with one handle per line (`#` starts a comment)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory to export to; nothing is written without it
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export format: csv or json
    #[arg(short, long, default_value = "csv")]
    format: ExportFormat,

    /// Only export these channels (repeatable; default: every channel with rows)
    #[arg(short, long = "channel")]
    channels: Vec<String>,

    /// Attempts per remote call, including the first
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Do not print rows to stdout
    #[arg(short, long)]
    quiet: bool,
}

/// Prints rows to stdout and progress and failures to stderr
struct ConsoleObserver {
    quiet: bool,
    last_percent: AtomicU8,
}

impl ConsoleObserver {
    fn new(quiet: bool) -> Self {
        Self {
            quiet,
            last_percent: AtomicU8::new(0),
        }
    }
}

impl RunObserver for ConsoleObserver {
    fn on_channel_started(&self, channel: &ChannelHandle) {
        eprintln!("==> {channel}");
    }

    fn on_row_emitted(&self, row: &VideoRow) {
        if !self.quiet {
            println!("{}\t{}\t{}", row.channel, row.title, row.url);
        }
    }

    fn on_progress(&self, percent: u8) {
        // Only report every tenth percent
        let previous = self.last_percent.load(Ordering::Relaxed);
        if percent / 10 > previous / 10 {
            self.last_percent.store(percent, Ordering::Relaxed);
            eprintln!("    {percent}%");
        }
    }

    fn on_channel_failed(&self, channel: &ChannelHandle, error: &UploadsError) {
        eprintln!("!!! {channel}: {error}");
    }

    fn on_run_complete(&self, status: RunStatus) {
        if status == RunStatus::Cancelled {
            eprintln!("Run cancelled");
        }
    }
}

/// Handles from a file body, one per line
fn parse_handle_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn read_handles(args: &Args) -> eyre::Result<Vec<String>> {
    let mut handles = args.handles.clone();
    if let Some(path) = &args.input {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read handles from {}", path.display()))?;
        handles.extend(parse_handle_lines(&contents));
    }
    if handles.is_empty() {
        eyre::bail!("no channel handles given; pass them as arguments or with --input");
    }
    Ok(handles)
}

fn export(report: &RunReport, args: &Args, directory: &Path) -> eyre::Result<()> {
    if !report.can_export() {
        tracing::warn!("no rows collected, nothing to export");
        return Ok(());
    }

    let selected = if args.channels.is_empty() {
        report
            .outcomes
            .iter()
            .map(|outcome| outcome.channel.clone())
            .collect()
    } else {
        args.channels
            .iter()
            .filter_map(|channel| ChannelHandle::parse(channel))
            .map(|handle| handle.to_string())
            .collect()
    };

    let request = ExportRequest {
        selected,
        format: args.format,
        directory: directory.to_path_buf(),
    };
    let summary = export_rows(&report.rows, &request).wrap_err("export failed")?;

    for path in &summary.written {
        eprintln!("wrote {}", path.display());
    }
    for channel in &summary.skipped {
        eprintln!("skipped {channel}: no rows");
    }
    for failure in &summary.failures {
        eprintln!("!!! {}: {}", failure.channel, failure.error);
    }
    if !summary.failures.is_empty() {
        eyre::bail!("{} export file(s) could not be written", summary.failures.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let handles = read_handles(&args)?;

    let config = ClientConfig {
        timeout_secs: args.timeout,
        ..ClientConfig::new(args.api_key.clone())
    };
    let mut retry = RetryPolicy::default();
    retry.max_attempts = args.max_attempts;
    let enumerator = ChannelEnumerator::with_config(config, retry)?;

    let cancel = enumerator.cancellation().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current call");
            cancel.cancel();
        }
    });

    let observer = ConsoleObserver::new(args.quiet);
    let report = enumerator.run(&handles, &observer).await?;

    let failed = report.failures().count();
    eprintln!(
        "{} rows from {} channel(s), {} failed",
        report.rows.len(),
        report.outcomes.len(),
        failed
    );

    if let Some(directory) = &args.output {
        export(&report, &args, directory)?;
    }

    Ok(())
}
