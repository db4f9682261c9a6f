//! Page fetching through a pluggable rendering engine
//!
//! This module handles:
//! - The `Renderer` / `RenderSession` seam the coordinator fetches through
//! - The plain HTTP engine, built on a shared `reqwest` client
//! - Engine selection from configuration
//! - Error classification into `RenderError`

use crate::config::{Engine, RendererConfig};
use crate::{ConfigError, CrawlError, RenderError, RenderErrorKind};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// A rendering engine capable of opening rendering sessions
///
/// One session is opened per crawl and closed on every exit path.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Acquires a rendering session
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// A live rendering session
#[async_trait]
pub trait RenderSession: Send {
    /// Loads the URL and returns the settled markup
    async fn render(&mut self, url: &str) -> Result<String, RenderError>;

    /// Tears the session down
    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}

/// Builds the renderer selected by the configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn Renderer>)` - Ready-to-use renderer
/// * `Err(CrawlError)` - The engine is unavailable or the client failed to build
pub fn build_renderer(config: &RendererConfig) -> Result<Arc<dyn Renderer>, CrawlError> {
    match config.engine {
        Engine::Http => Ok(Arc::new(HttpRenderer::new(config)?)),
        #[cfg(feature = "chrome")]
        Engine::Chrome => Ok(Arc::new(super::chrome::ChromeRenderer::new(config.clone()))),
        #[cfg(not(feature = "chrome"))]
        Engine::Chrome => Err(ConfigError::Validation(
            "engine \"chrome\" requires building with the `chrome` feature".to_string(),
        )
        .into()),
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use ripple_scrape::config::RendererConfig;
/// use ripple_scrape::crawler::build_http_client;
///
/// let client = build_http_client(&RendererConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &RendererConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches markup with a plain HTTP GET
///
/// Redirects are followed. No scripts run, so the markup is what the
/// server sent.
pub struct HttpRenderer {
    client: Client,
    timeout: Duration,
    fail_on_http_error: bool,
}

impl HttpRenderer {
    pub fn new(config: &RendererConfig) -> Result<Self, ConfigError> {
        let client = build_http_client(config)
            .map_err(|e| ConfigError::Validation(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            timeout: config.request_timeout(),
            fail_on_http_error: config.fail_on_http_error,
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
            timeout: self.timeout,
            fail_on_http_error: self.fail_on_http_error,
        }))
    }
}

struct HttpSession {
    client: Client,
    timeout: Duration,
    fail_on_http_error: bool,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn render(&mut self, url: &str) -> Result<String, RenderError> {
        let page = fetch_url(&self.client, url, self.timeout).await?;

        if self.fail_on_http_error && !page.status.is_success() {
            return Err(RenderError::new(
                url,
                RenderErrorKind::HttpStatus(page.status.as_u16()),
            ));
        }

        Ok(page.body)
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        Ok(())
    }
}

/// A fetched page
#[derive(Debug)]
pub struct FetchedPage {
    pub status: StatusCode,
    pub body: String,
}

/// Fetches a URL and classifies failures
///
/// | Condition | Result |
/// |-----------|--------|
/// | any status | `FetchedPage` with the body, non-2xx logged at warn |
/// | timeout | `Timeout` |
/// | connect / body error | `Network` |
///
/// Error pages are returned like any other page; only transport failures
/// are errors. `timeout` is the client's request timeout, reported in
/// timeout errors.
pub async fn fetch_url(client: &Client, url: &str, timeout: Duration) -> Result<FetchedPage, RenderError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_reqwest_error(url, timeout, e))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("{} answered with HTTP {}", url, status.as_u16());
    }

    let body = response
        .text()
        .await
        .map_err(|e| classify_reqwest_error(url, timeout, e))?;

    Ok(FetchedPage { status, body })
}

fn classify_reqwest_error(url: &str, timeout: Duration, error: reqwest::Error) -> RenderError {
    let kind = if error.is_timeout() {
        RenderErrorKind::Timeout(timeout)
    } else if error.is_connect() {
        RenderErrorKind::Network(format!("connection failed: {}", error))
    } else if error.is_builder() {
        RenderErrorKind::Engine(error.to_string())
    } else {
        RenderErrorKind::Network(error.to_string())
    };
    RenderError::new(url, kind)
}
