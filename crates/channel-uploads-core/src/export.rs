//! Per-channel export of collected rows
//!
//! Groups the row log by channel and writes one file per selected channel,
//! named `<stem>_output.<ext>`. A failed file is recorded and the
//! remaining channels are still written.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UploadsError};
use crate::types::VideoRow;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Tabular: `,Title,Url` header, one indexed row per video
    Csv,
    /// Structured: array of `{"Title", "Url"}` objects
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = UploadsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "tabular" => Ok(ExportFormat::Csv),
            "json" | "structured" => Ok(ExportFormat::Json),
            other => Err(UploadsError::InputInvalid(format!(
                "Unknown export format: {other}"
            ))),
        }
    }
}

/// What to export and where
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Channel display names to include
    pub selected: Vec<String>,
    pub format: ExportFormat,
    pub directory: PathBuf,
}

/// A channel whose file could not be written
#[derive(Debug, Serialize)]
pub struct ExportFailure {
    pub channel: String,
    pub error: UploadsError,
}

/// Result of one export
#[derive(Debug, Default, Serialize)]
pub struct ExportSummary {
    /// Files written, in channel order
    pub written: Vec<PathBuf>,
    /// Selected channels with no rows; no file is created for them
    pub skipped: Vec<String>,
    pub failures: Vec<ExportFailure>,
}

/// One exported record, as it appears in both formats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedVideo {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Url")]
    pub url: String,
}

/// Keep only alphanumerics, `-` and `_`
///
/// A handle made only of other characters yields an empty stem.
///
/// # Example
/// ```
/// use channel_uploads_core::sanitize_file_stem;
/// assert_eq!(sanitize_file_stem("My Channel!"), "MyChannel");
/// assert_eq!(sanitize_file_stem("a-b_c"), "a-b_c");
/// ```
pub fn sanitize_file_stem(channel: &str) -> String {
    channel
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// File name for a channel's export
pub fn output_file_name(channel: &str, format: ExportFormat) -> String {
    format!("{}_output.{}", sanitize_file_stem(channel), format.extension())
}

/// Group rows by channel, in order of each channel's first row
///
/// Rows keep their relative order within a channel. Channels not in
/// `selected` are left out.
pub fn group_rows<'a>(rows: &'a [VideoRow], selected: &[String]) -> Vec<(&'a str, Vec<&'a VideoRow>)> {
    let mut groups: Vec<(&'a str, Vec<&'a VideoRow>)> = Vec::new();

    for row in rows {
        if !selected.iter().any(|s| s == &row.channel) {
            continue;
        }
        match groups.iter_mut().find(|(channel, _)| *channel == row.channel) {
            Some((_, group)) => group.push(row),
            None => groups.push((row.channel.as_str(), vec![row])),
        }
    }

    groups
}

/// Write one file per selected channel that has rows
///
/// # Errors
/// - `InputInvalid` if there are no rows or no channel is selected
/// - `ExportWrite` if the destination directory cannot be created
///
/// Failures writing an individual file are collected in
/// [`ExportSummary::failures`] instead. That includes a channel whose
/// sanitized name matches one already written in the same export; the
/// earlier file is kept.
pub fn export_rows(rows: &[VideoRow], request: &ExportRequest) -> Result<ExportSummary> {
    if rows.is_empty() {
        return Err(UploadsError::InputInvalid("No data to save".to_string()));
    }
    if request.selected.is_empty() {
        return Err(UploadsError::InputInvalid(
            "No channels selected".to_string(),
        ));
    }

    fs::create_dir_all(&request.directory).map_err(|e| UploadsError::ExportWrite {
        path: request.directory.display().to_string(),
        reason: e.to_string(),
    })?;

    let groups = group_rows(rows, &request.selected);
    let mut summary = ExportSummary::default();

    for channel in &request.selected {
        if !groups.iter().any(|(name, _)| name == channel) && !summary.skipped.contains(channel) {
            tracing::debug!(%channel, "no rows, skipping export");
            summary.skipped.push(channel.clone());
        }
    }

    let mut claimed: HashSet<String> = HashSet::with_capacity(groups.len());

    for (channel, group) in groups {
        let file_name = output_file_name(channel, request.format);
        if sanitize_file_stem(channel).is_empty() {
            tracing::warn!(%channel, %file_name, "channel name has no file-safe characters");
        }
        let path = request.directory.join(&file_name);

        // First channel to sanitize to a name keeps the file
        if !claimed.insert(file_name.clone()) {
            let error = UploadsError::ExportWrite {
                path: path.display().to_string(),
                reason: "file name already used by another channel in this export".to_string(),
            };
            tracing::warn!(%channel, %error, "export failed");
            summary.failures.push(ExportFailure {
                channel: channel.to_string(),
                error,
            });
            continue;
        }

        match write_channel_file(&path, &group, request.format) {
            Ok(()) => {
                tracing::info!(%channel, path = %path.display(), rows = group.len(), "exported");
                summary.written.push(path);
            }
            Err(error) => {
                tracing::warn!(%channel, %error, "export failed");
                summary.failures.push(ExportFailure {
                    channel: channel.to_string(),
                    error,
                });
            }
        }
    }

    Ok(summary)
}

fn write_channel_file(path: &Path, rows: &[&VideoRow], format: ExportFormat) -> Result<()> {
    let contents = match format {
        ExportFormat::Csv => render_csv(rows),
        ExportFormat::Json => render_json(rows)?,
    };
    fs::write(path, contents).map_err(|e| UploadsError::ExportWrite {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn render_csv(rows: &[&VideoRow]) -> String {
    let mut out = String::from(",Title,Url\n");
    for (index, row) in rows.iter().enumerate() {
        out.push_str(&index.to_string());
        out.push(',');
        push_csv_field(&mut out, &row.title);
        out.push(',');
        push_csv_field(&mut out, &row.url);
        out.push('\n');
    }
    out
}

fn push_csv_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

fn render_json(rows: &[&VideoRow]) -> Result<String> {
    let records: Vec<ExportedVideo> = rows
        .iter()
        .map(|row| ExportedVideo {
            title: row.title.clone(),
            url: row.url.clone(),
        })
        .collect();
    serde_json::to_string_pretty(&records)
        .map_err(|e| UploadsError::ParseError(format!("JSON export: {}", e)))
}

/// Read back a file written by [`export_rows`]
pub fn read_export(path: &Path, format: ExportFormat) -> Result<Vec<ExportedVideo>> {
    let contents = fs::read_to_string(path)?;
    match format {
        ExportFormat::Json => serde_json::from_str(&contents)
            .map_err(|e| UploadsError::ParseError(format!("JSON export: {}", e))),
        ExportFormat::Csv => parse_csv(&contents)
            .into_iter()
            .skip(1)
            .map(|record| match record.as_slice() {
                [_, title, url] => Ok(ExportedVideo {
                    title: title.clone(),
                    url: url.clone(),
                }),
                _ => Err(UploadsError::ParseError(format!(
                    "CSV export: expected 3 fields, found {}",
                    record.len()
                ))),
            })
            .collect(),
    }
}

/// Split CSV text into records, honoring quoted fields
fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => record.push(std::mem::take(&mut field)),
            ('\r', false) if chars.peek() == Some(&'\n') => {}
            ('\n', false) => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            (c, _) => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(channel: &str, title: &str) -> VideoRow {
        VideoRow {
            channel: channel.to_string(),
            title: title.to_string(),
            url: format!("https://www.youtube.com/watch?v={}", title.len()),
        }
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("Alpha"), "Alpha");
        assert_eq!(sanitize_file_stem("@Al pha.TV"), "AlphaTV");
        assert_eq!(sanitize_file_stem("über-kanal_1"), "über-kanal_1");
    }

    #[test]
    fn test_sanitize_only_disallowed_is_empty() {
        assert_eq!(sanitize_file_stem("!!! ..."), "");
        assert_eq!(output_file_name("!!!", ExportFormat::Csv), "_output.csv");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("Alpha", ExportFormat::Json), "Alpha_output.json");
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("structured".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(UploadsError::InputInvalid(_))
        ));
    }

    #[test]
    fn test_group_rows_preserves_order_and_selection() {
        let rows = vec![
            row("Beta", "b1"),
            row("Alpha", "a1"),
            row("Beta", "b2"),
            row("Gamma", "g1"),
            row("Alpha", "a2"),
        ];
        let selected = vec!["Alpha".to_string(), "Beta".to_string()];

        let groups = group_rows(&rows, &selected);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Beta");
        assert_eq!(
            groups[0].1.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
            vec!["b1", "b2"]
        );
        assert_eq!(groups[1].0, "Alpha");
        assert_eq!(
            groups[1].1.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
            vec!["a1", "a2"]
        );
    }

    #[test]
    fn test_render_csv_quotes_special_fields() {
        let first = row("Alpha", "Hello, \"World\"");
        let second = row("Alpha", "plain");
        let csv = render_csv(&[&first, &second]);

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(",Title,Url"));
        assert_eq!(
            lines.next(),
            Some("0,\"Hello, \"\"World\"\"\",https://www.youtube.com/watch?v=14")
        );
        assert_eq!(lines.next(), Some("1,plain,https://www.youtube.com/watch?v=5"));
    }

    #[test]
    fn test_parse_csv_multiline_field() {
        let records = parse_csv(",Title,Url\n0,\"two\nlines\",u\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], vec!["0", "two\nlines", "u"]);
    }

    #[test]
    fn test_render_json_keys() {
        let first = row("Alpha", "t");
        let json = render_json(&[&first]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["Title"], "t");
        assert_eq!(value[0]["Url"], "https://www.youtube.com/watch?v=1");
    }

    #[test]
    fn test_export_rows_requires_data() {
        let request = ExportRequest {
            selected: vec!["Alpha".to_string()],
            format: ExportFormat::Csv,
            directory: PathBuf::from("unused"),
        };
        assert!(matches!(
            export_rows(&[], &request),
            Err(UploadsError::InputInvalid(_))
        ));
    }

    #[test]
    fn test_export_rows_requires_selection() {
        let request = ExportRequest {
            selected: Vec::new(),
            format: ExportFormat::Csv,
            directory: PathBuf::from("unused"),
        };
        assert!(matches!(
            export_rows(&[row("Alpha", "a")], &request),
            Err(UploadsError::InputInvalid(_))
        ));
    }
}
