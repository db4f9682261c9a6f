//! Output module for rendering crawl results
//!
//! This module handles:
//! - The `{"scrapedData": [...]}` JSON envelope and error body
//! - Human-readable markdown reports
//! - Crawl statistics recorded by the coordinator

mod json;
mod markdown;
pub mod stats;

pub use json::{format_error, format_json, ErrorResponse, ScrapeResponse};
pub use markdown::format_markdown_report;
pub use stats::{format_statistics, print_statistics, CrawlStatistics};

use crate::crawler::CrawlOutcome;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Rendering of a crawl outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `{"scrapedData": [{"url", "data"}]}`
    #[default]
    Json,
    /// Report with one section per page
    Markdown,
    /// Statistics only
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "text" => Ok(Self::Text),
            other => Err(format!(
                "unknown output format {:?} (expected json, markdown or text)",
                other
            )),
        }
    }
}

/// Renders an outcome in the requested format
pub fn render_outcome(outcome: &CrawlOutcome, format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Json => format_json(&outcome.pages),
        OutputFormat::Markdown => Ok(format_markdown_report(outcome)),
        OutputFormat::Text => Ok(format_statistics(&outcome.stats, outcome.termination)),
    }
}

/// Writes a rendered outcome to a file, or to stdout when no path is given
///
/// # Returns
///
/// * `Ok(())` - Output written
/// * `Err(OutputError)` - Encoding or writing failed
pub fn write_outcome(
    outcome: &CrawlOutcome,
    format: OutputFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    let rendered = render_outcome(outcome, format)?;

    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("Markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_outcome_formats() {
        let outcome = fixtures::outcome();

        let json = render_outcome(&outcome, OutputFormat::Json).unwrap();
        assert!(json.contains("scrapedData"));

        let md = render_outcome(&outcome, OutputFormat::Markdown).unwrap();
        assert!(md.contains("## https://example.com/about"));

        let text = render_outcome(&outcome, OutputFormat::Text).unwrap();
        assert!(text.contains("Pages visited: 2"));
    }

    #[test]
    fn test_write_outcome_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_outcome(&fixtures::outcome(), OutputFormat::Json, Some(&path)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["scrapedData"][0]["data"], "Hi");
    }
}
