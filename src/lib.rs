//! Ripple-Scrape: a single-origin text crawler
//!
//! This crate crawls one website breadth-first from a seed URL, stays inside the
//! seed's origin, extracts readable text from every visited page, and streams
//! "currently visiting" notifications to at most one live observer.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Ripple-Scrape operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL '{seed}': {reason}")]
    InvalidSeed { seed: String, reason: String },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },
}

impl CrawlError {
    /// Message safe to hand back to whoever triggered the crawl
    ///
    /// Seed validation problems are reported verbatim; everything else collapses
    /// into one generic descriptor.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidSeed { reason, .. } => reason.clone(),
            _ => "An unexpected error occurred.".to_string(),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// A page could not be fetched or rendered
#[derive(Debug, Error)]
#[error("Failed to render {url}: {kind}")]
pub struct RenderError {
    pub url: String,
    pub kind: RenderErrorKind,
}

/// What went wrong while rendering a page
#[derive(Debug, Error)]
pub enum RenderErrorKind {
    #[error("network error: {0}")]
    Network(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("failed to start rendering session: {0}")]
    Launch(String),
}

impl RenderError {
    pub fn new(url: impl Into<String>, kind: RenderErrorKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// Returns true for failures that may succeed on another attempt
    ///
    /// Timeouts, network errors and 5xx responses are transient; 4xx responses,
    /// engine crashes and launch failures are not.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            RenderErrorKind::Network(_) | RenderErrorKind::Timeout(_) => true,
            RenderErrorKind::HttpStatus(status) => status >= 500,
            RenderErrorKind::Engine(_) | RenderErrorKind::Launch(_) => false,
        }
    }
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, Coordinator, PageResult, Termination};
pub use state::CrawlState;
pub use crate::url::Origin;
