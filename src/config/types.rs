use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Page ceiling applied when the configuration does not set one
pub const DEFAULT_MAX_PAGES: usize = 500;

/// Main configuration structure for Ripple-Scrape
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub renderer: RendererConfig,
    pub progress: ProgressConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of distinct pages visited in one crawl
    pub max_pages: usize,

    /// Deadline for a single page fetch in seconds (0 disables the deadline)
    pub fetch_timeout_secs: u64,

    /// What to do when a page cannot be rendered
    pub on_render_failure: RenderFailurePolicy,

    /// Extra attempts for transient failures before a page is skipped
    pub render_retries: u32,

    /// Suppress duplicate frontier entries eagerly with a pending set
    pub dedup_pending: bool,

    /// Require a host boundary after the origin prefix when scoping links
    pub strict_origin: bool,

    /// Emit an info-level progress line every N visited pages
    pub progress_every: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            fetch_timeout_secs: 0,
            on_render_failure: RenderFailurePolicy::FailFast,
            render_retries: 0,
            dedup_pending: false,
            strict_origin: false,
            progress_every: 10,
        }
    }
}

impl CrawlerConfig {
    /// The per-fetch deadline, if one is configured
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_secs > 0).then(|| Duration::from_secs(self.fetch_timeout_secs))
    }
}

/// Policy applied when a page fails to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderFailurePolicy {
    /// Abort the whole crawl and discard accumulated results
    FailFast,
    /// Retry transient failures, then leave the page out and continue
    Skip,
}

/// Rendering engine selection and tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RendererConfig {
    /// Which engine renders pages
    pub engine: Engine,

    /// User agent sent with every request
    pub user_agent: String,

    /// Timeout for a single HTTP request or browser command (seconds)
    pub request_timeout_secs: u64,

    /// How long the network must stay quiet before a page counts as settled (ms)
    pub settle_idle_ms: u64,

    /// Maximum in-flight requests that still count as quiet
    pub settle_max_inflight: usize,

    /// Give up waiting for network idle after this many seconds
    pub settle_timeout_secs: u64,

    /// Treat non-2xx responses as render failures (http engine only)
    ///
    /// Off by default: error pages are extracted like any other page.
    pub fail_on_http_error: bool,

    /// Browser binary to launch instead of the auto-detected one
    pub chrome_executable: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            user_agent: format!("ripple-scrape/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
            settle_idle_ms: 500,
            settle_max_inflight: 2,
            settle_timeout_secs: 30,
            fail_on_http_error: false,
            chrome_executable: None,
        }
    }
}

impl RendererConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn settle_idle(&self) -> Duration {
        Duration::from_millis(self.settle_idle_ms)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.settle_timeout_secs)
    }
}

/// Available rendering engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Plain HTTP fetch; returns the served markup without running scripts
    Http,
    /// Headless Chromium; requires the `chrome` feature
    Chrome,
}

impl Default for Engine {
    /// Headless Chromium when it is compiled in, plain HTTP otherwise
    fn default() -> Self {
        if cfg!(feature = "chrome") {
            Self::Chrome
        } else {
            Self::Http
        }
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "chrome" => Ok(Self::Chrome),
            other => Err(format!("unknown engine '{}', expected 'http' or 'chrome'", other)),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Chrome => write!(f, "chrome"),
        }
    }
}

/// Progress observer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProgressConfig {
    /// Capacity of the bounded observer channel; events beyond it are dropped
    pub channel_capacity: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
        }
    }
}
