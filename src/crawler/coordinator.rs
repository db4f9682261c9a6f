//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop. Everything a crawl touches (frontier,
//! visited set, results, statistics) lives in a `CrawlRun` created per call to
//! [`Coordinator::crawl`], so concurrent crawls never share state. The only
//! thing shared between crawls is the progress observer slot.

use crate::config::{validate, Config, CrawlerConfig, RenderFailurePolicy};
use crate::crawler::fetcher::{build_renderer, RenderSession, Renderer};
use crate::crawler::frontier::{Frontier, VisitedSet};
use crate::crawler::parser::parse_html;
use crate::crawler::progress::ProgressPublisher;
use crate::output::CrawlStatistics;
use crate::state::CrawlState;
use crate::url::{Origin, ScopeGuard};
use crate::{CrawlError, RenderError, RenderErrorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Text extracted from one visited page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    #[serde(rename = "data")]
    pub text: String,
}

/// Why a completed crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Every reachable in-scope URL was visited
    FrontierExhausted,
    /// The page ceiling was reached with URLs still queued
    PageCeiling,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrontierExhausted => write!(f, "frontier exhausted"),
            Self::PageCeiling => write!(f, "page ceiling reached"),
        }
    }
}

/// Result of a completed crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub seed: String,
    pub origin: String,
    /// Pages in visit order
    pub pages: Vec<PageResult>,
    pub termination: Termination,
    pub stats: CrawlStatistics,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// A validated crawl request
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    seed: String,
    origin: Origin,
}

impl CrawlRequest {
    /// Validates the seed and derives its origin
    ///
    /// Empty or whitespace-only seeds are rejected with `URL is required`.
    pub fn new(seed: &str) -> Result<Self, CrawlError> {
        let trimmed = seed.trim();
        if trimmed.is_empty() {
            return Err(CrawlError::InvalidSeed {
                seed: seed.to_string(),
                reason: "URL is required".to_string(),
            });
        }

        let origin = Origin::from_seed(trimmed).map_err(|e| CrawlError::InvalidSeed {
            seed: seed.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            seed: trimmed.to_string(),
            origin,
        })
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    renderer: Arc<dyn Renderer>,
    progress: ProgressPublisher,
}

impl Coordinator {
    /// Creates a coordinator around an existing renderer
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid
    /// * `Err(CrawlError)` - Configuration failed validation
    pub fn new(config: Config, renderer: Arc<dyn Renderer>) -> Result<Self, CrawlError> {
        validate(&config)?;
        let progress = ProgressPublisher::new(config.progress.channel_capacity);
        Ok(Self {
            config: Arc::new(config),
            renderer,
            progress,
        })
    }

    /// Validates the configuration and builds the configured renderer
    pub fn from_config(config: Config) -> Result<Self, CrawlError> {
        validate(&config)?;
        let renderer = build_renderer(&config.renderer)?;
        Self::new(config, renderer)
    }

    /// Replaces the progress publisher, e.g. with one shared with a connection handler
    pub fn with_progress(mut self, progress: ProgressPublisher) -> Self {
        self.progress = progress;
        self
    }

    pub fn progress(&self) -> &ProgressPublisher {
        &self.progress
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Crawls the seed's origin breadth-first
    ///
    /// The rendering session is opened after the seed validates and is closed
    /// on every exit path. A teardown failure is logged and does not change the
    /// result.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - Frontier exhausted or page ceiling reached
    /// * `Err(CrawlError)` - Invalid seed, or a render failure under the fail-fast policy
    pub async fn crawl(&self, seed: &str) -> Result<CrawlOutcome, CrawlError> {
        let request = CrawlRequest::new(seed)?;
        let mut run = CrawlRun::start(&request, &self.config.crawler)?;

        tracing::info!(
            "Starting crawl of {} (origin {}, ceiling {} pages)",
            request.seed(),
            request.origin(),
            self.config.crawler.max_pages
        );

        let mut session = match self.renderer.open().await {
            Ok(session) => session,
            Err(e) => {
                run.fail()?;
                tracing::error!("Could not open rendering session: {}", e);
                return Err(e.into());
            }
        };

        let traversal = run.traverse(session.as_mut(), &self.progress).await;

        tracing::debug!("Tearing down rendering session");
        if let Err(e) = session.close().await {
            tracing::warn!("Rendering session did not shut down cleanly: {}", e);
        }

        match traversal {
            Ok(termination) => run.complete(termination),
            Err(e) => {
                run.fail()?;
                tracing::error!("Crawl of {} failed: {}", request.seed(), e);
                Err(e)
            }
        }
    }
}

/// State owned by a single crawl invocation
struct CrawlRun<'a> {
    request: &'a CrawlRequest,
    settings: &'a CrawlerConfig,
    state: CrawlState,
    scope: ScopeGuard,
    frontier: Frontier,
    visited: VisitedSet,
    pages: Vec<PageResult>,
    stats: CrawlStatistics,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl<'a> CrawlRun<'a> {
    /// Seeds the frontier and moves the run from idle to running
    fn start(request: &'a CrawlRequest, settings: &'a CrawlerConfig) -> Result<Self, CrawlError> {
        let scope = if settings.strict_origin {
            ScopeGuard::strict(request.origin().clone())
        } else {
            ScopeGuard::new(request.origin().clone())
        };
        let frontier = if settings.dedup_pending {
            Frontier::with_pending_dedup()
        } else {
            Frontier::new()
        };

        let mut run = Self {
            request,
            settings,
            state: CrawlState::Idle,
            scope,
            frontier,
            visited: VisitedSet::new(),
            pages: Vec::new(),
            stats: CrawlStatistics::default(),
            started: Instant::now(),
            started_at: Utc::now(),
        };

        run.frontier
            .push(request.seed().to_string(), &run.visited);
        run.state = run.state.transition(CrawlState::Running)?;

        Ok(run)
    }

    /// Runs the visit loop until the frontier empties or the ceiling is hit
    async fn traverse(
        &mut self,
        session: &mut dyn RenderSession,
        progress: &ProgressPublisher,
    ) -> Result<Termination, CrawlError> {
        while !self.frontier.is_empty() && self.visited.len() < self.settings.max_pages {
            let Some(url) = self.frontier.pop() else {
                break;
            };

            if self.visited.contains(&url) {
                self.stats.revisits_skipped += 1;
                continue;
            }

            tracing::debug!("Visiting URL: {}", url);
            progress.publish(&url);

            match self.fetch(session, &url).await? {
                Some(html) => self.process_page(&url, &html),
                None => self.stats.failed_urls.push(url.clone()),
            }

            self.visited.add(url);
            self.stats.pages_visited = self.visited.len();

            if self.visited.len() % self.settings.progress_every == 0 {
                let elapsed = self.started.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    self.visited.len() as f64 / elapsed
                } else {
                    0.0
                };
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {:.2} pages/sec",
                    self.visited.len(),
                    self.frontier.len(),
                    rate
                );
            }
        }

        if self.frontier.is_empty() {
            Ok(Termination::FrontierExhausted)
        } else {
            Ok(Termination::PageCeiling)
        }
    }

    /// Fetches one page, applying the deadline and the failure policy
    ///
    /// Returns `Ok(None)` when the page failed and the policy says skip it.
    async fn fetch(
        &mut self,
        session: &mut dyn RenderSession,
        url: &str,
    ) -> Result<Option<String>, CrawlError> {
        let mut attempt = 0;

        loop {
            let error = match render_with_deadline(session, url, self.settings.fetch_timeout()).await {
                Ok(html) => return Ok(Some(html)),
                Err(e) => e,
            };

            match self.settings.on_render_failure {
                RenderFailurePolicy::FailFast => return Err(error.into()),
                RenderFailurePolicy::Skip => {
                    if error.is_retryable() && attempt < self.settings.render_retries {
                        attempt += 1;
                        self.stats.render_retries += 1;
                        tracing::warn!(
                            "Retrying {} (attempt {} of {}): {}",
                            url,
                            attempt,
                            self.settings.render_retries,
                            error
                        );
                        continue;
                    }

                    tracing::warn!("Skipping {}: {}", url, error);
                    return Ok(None);
                }
            }
        }
    }

    /// Extracts text and queues in-scope links from a rendered page
    fn process_page(&mut self, url: &str, html: &str) {
        let parsed = parse_html(html, &self.scope);

        self.stats.characters_extracted += parsed.text.chars().count();
        self.stats.links_out_of_scope += parsed.out_of_scope;
        self.stats.links_malformed += parsed.malformed;

        for link in parsed.links {
            self.stats.links_discovered += 1;
            if self.frontier.push(link, &self.visited) {
                self.stats.links_enqueued += 1;
            }
        }

        self.pages.push(PageResult {
            url: url.to_string(),
            text: parsed.text,
        });
    }

    fn complete(mut self, termination: Termination) -> Result<CrawlOutcome, CrawlError> {
        self.state = self.state.transition(CrawlState::Completed)?;
        self.stats.duration_ms = duration_ms(self.started.elapsed());

        tracing::info!(
            "Crawl completed ({}): {} pages in {:?}",
            termination,
            self.pages.len(),
            self.started.elapsed()
        );

        Ok(CrawlOutcome {
            seed: self.request.seed().to_string(),
            origin: self.request.origin().to_string(),
            pages: self.pages,
            termination,
            stats: self.stats,
            started_at: self.started_at,
            finished_at: Utc::now(),
        })
    }

    fn fail(&mut self) -> Result<(), CrawlError> {
        self.state = self.state.transition(CrawlState::Failed)?;
        Ok(())
    }
}

async fn render_with_deadline(
    session: &mut dyn RenderSession,
    url: &str,
    deadline: Option<Duration>,
) -> Result<String, RenderError> {
    let Some(limit) = deadline else {
        return session.render(url).await;
    };

    match tokio::time::timeout(limit, session.render(url)).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::new(url, RenderErrorKind::Timeout(limit))),
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
