//! Headless Chromium rendering engine
//!
//! One browser process and one tab per crawl. Each render navigates the tab,
//! then waits for network idle before reading the DOM back as HTML.

use crate::config::RendererConfig;
use crate::crawler::fetcher::{RenderSession, Renderer};
use crate::crawler::idle::NetworkIdle;
use crate::{RenderError, RenderErrorKind};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Renders pages in headless Chromium
pub struct ChromeRenderer {
    config: RendererConfig,
}

impl ChromeRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let launch_error = |message: String| RenderError::new("about:blank", RenderErrorKind::Launch(message));

        let mut builder = BrowserConfig::builder();
        if let Some(executable) = &self.config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        let browser_config = builder
            .request_timeout(self.config.request_timeout())
            .arg(format!("--user-agent={}", self.config.user_agent))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .arg("--mute-audio")
            .build()
            .map_err(launch_error)?;

        tracing::info!("Launching headless browser");
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| launch_error(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {:?}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(launch_error(e.to_string()));
            }
        };

        Ok(Box::new(ChromeSession {
            browser,
            handler,
            page,
            config: self.config.clone(),
        }))
    }
}

/// What the settle loop does next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettleStep {
    Settled,
    GaveUp,
    Wait(Duration),
}

/// Decides whether a navigation has settled, timed out, or needs more time
///
/// `fallback` is how long to sleep while too many requests are in flight;
/// the wait never runs past `deadline`.
fn settle_step(idle: &NetworkIdle, now: Instant, deadline: Instant, fallback: Duration) -> SettleStep {
    if idle.is_settled(now) {
        return SettleStep::Settled;
    }
    if now >= deadline {
        return SettleStep::GaveUp;
    }

    let wait = idle
        .time_until_settled(now)
        .unwrap_or(fallback)
        .min(deadline - now);
    SettleStep::Wait(wait)
}

struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    config: RendererConfig,
}

impl ChromeSession {
    async fn wait_for_network_idle(&self, url: &str) -> Result<(), RenderError> {
        let engine_error = |e: chromiumoxide::error::CdpError| {
            RenderError::new(url, RenderErrorKind::Engine(e.to_string()))
        };

        let mut started = self
            .page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(engine_error)?;
        let mut finished = self
            .page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(engine_error)?;
        let mut failed = self
            .page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(engine_error)?;

        self.page.goto(url).await.map_err(engine_error)?;

        let begin = Instant::now();
        let deadline = begin + self.config.settle_timeout();
        let mut idle = NetworkIdle::new(
            self.config.settle_max_inflight,
            self.config.settle_idle(),
            begin,
        );

        loop {
            let now = Instant::now();
            let wait = match settle_step(&idle, now, deadline, self.config.settle_idle()) {
                SettleStep::Settled => {
                    tracing::trace!("{} settled after {:?}", url, now - begin);
                    return Ok(());
                }
                SettleStep::GaveUp => {
                    tracing::warn!(
                        "{} still has {} requests in flight after {:?}, using current DOM",
                        url,
                        idle.inflight(),
                        self.config.settle_timeout()
                    );
                    return Ok(());
                }
                SettleStep::Wait(wait) => wait,
            };

            tokio::select! {
                Some(event) = started.next() => {
                    idle.request_started(event.request_id.inner().clone(), Instant::now());
                }
                Some(event) = finished.next() => {
                    idle.request_finished(event.request_id.inner(), Instant::now());
                }
                Some(event) = failed.next() => {
                    idle.request_finished(event.request_id.inner(), Instant::now());
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}

#[async_trait]
impl RenderSession for ChromeSession {
    async fn render(&mut self, url: &str) -> Result<String, RenderError> {
        self.wait_for_network_idle(url).await?;

        self.page
            .content()
            .await
            .map_err(|e| RenderError::new(url, RenderErrorKind::Engine(e.to_string())))
    }

    async fn close(mut self: Box<Self>) -> Result<(), RenderError> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| RenderError::new("about:blank", RenderErrorKind::Engine(e.to_string())));

        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed waiting for browser process to exit: {}", e);
        }
        self.handler.abort();

        closed
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
