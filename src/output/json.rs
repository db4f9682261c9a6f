//! JSON bodies for results and failures

use crate::crawler::PageResult;
use crate::output::OutputResult;
use serde::{Deserialize, Serialize};

/// Successful crawl body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    #[serde(rename = "scrapedData")]
    pub scraped_data: Vec<PageResult>,
}

/// Failed crawl body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Formats pages as the pretty-printed `scrapedData` envelope
pub fn format_json(pages: &[PageResult]) -> OutputResult<String> {
    let body = ScrapeResponse {
        scraped_data: pages.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&body)?)
}

/// Formats an error descriptor as `{"error": "..."}`
pub fn format_error(message: &str) -> OutputResult<String> {
    let body = ErrorResponse {
        error: message.to_string(),
    };
    Ok(serde_json::to_string(&body)?)
}
