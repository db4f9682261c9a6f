//! Crawler module for single-origin text scraping
//!
//! This module contains the core crawling logic, including:
//! - Page fetching through a pluggable rendering engine
//! - Text extraction and link discovery
//! - The breadth-first frontier and visited set
//! - Progress notifications and overall crawl coordination

#[cfg(feature = "chrome")]
mod chrome;
mod coordinator;
mod fetcher;
mod frontier;
mod idle;
mod parser;
mod progress;

#[cfg(feature = "chrome")]
pub use chrome::ChromeRenderer;
pub use coordinator::{Coordinator, CrawlOutcome, CrawlRequest, PageResult, Termination};
pub use fetcher::{
    build_http_client, build_renderer, fetch_url, FetchedPage, HttpRenderer, RenderSession, Renderer,
};
pub use frontier::{Frontier, VisitedSet};
pub use idle::NetworkIdle;
pub use parser::{collapse_whitespace, extract_text, parse_html, ParsedPage, TEXT_TAGS};
pub use progress::{ProgressEvent, ProgressPublisher};

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl of the seed's origin
///
/// Convenience wrapper that validates the configuration, builds the
/// configured renderer and crawls once. Use [`Coordinator`] directly to
/// observe progress or to reuse a renderer across crawls.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The starting URL
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed
/// * `Err(CrawlError)` - Crawl failed
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlOutcome, CrawlError> {
    Coordinator::from_config(config)?.crawl(seed).await
}
