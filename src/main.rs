//! Ripple-Scrape main entry point
//!
//! This is the command-line interface for the Ripple-Scrape text crawler.

use anyhow::Context;
use clap::Parser;
use ripple_scrape::config::{load_config_with_hash, Config, Engine, RenderFailurePolicy};
use ripple_scrape::crawler::Coordinator;
use ripple_scrape::output::{format_error, print_statistics, write_outcome, OutputFormat};
use ripple_scrape::CrawlError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Ripple-Scrape: a single-origin text crawler
///
/// Crawls one website breadth-first from URL, never leaving its origin, and
/// prints the text of every visited page as `{"scrapedData": [...]}`.
#[derive(Parser, Debug)]
#[command(name = "ripple-scrape")]
#[command(version)]
#[command(about = "A single-origin text crawler", long_about = None)]
struct Cli {
    /// Seed URL; its origin bounds the crawl
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Maximum number of pages to visit
    #[arg(long)]
    max_pages: Option<usize>,

    /// Rendering engine: chrome (default when built in) or http
    #[arg(long)]
    engine: Option<Engine>,

    /// Per-page fetch deadline in seconds (0 disables it)
    #[arg(long, value_name = "SECS")]
    fetch_timeout: Option<u64>,

    /// Skip pages that fail to render instead of aborting the crawl
    #[arg(long)]
    skip_failures: bool,

    /// Output format (json, markdown or text)
    #[arg(long, default_value = "json")]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print each visited URL to stderr as {"currentUrl": ...}
    #[arg(long)]
    progress: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            let message = match e.downcast_ref::<CrawlError>() {
                Some(crawl_error) => crawl_error.public_message(),
                None => "An unexpected error occurred.".to_string(),
            };
            match format_error(&message) {
                Ok(body) => println!("{}", body),
                Err(encode_error) => tracing::error!("Could not encode error body: {}", encode_error),
            }
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the crawl output.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_scrape=info,warn"),
            1 => EnvFilter::new("ripple_scrape=debug,info"),
            2 => EnvFilter::new("ripple_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .map_err(CrawlError::from)
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, &cli);

    let coordinator = Coordinator::from_config(config)?;

    let observer = if cli.progress {
        let mut rx = coordinator.progress().connect();
        Some(tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match serde_json::to_string(&event) {
                    Ok(line) => eprintln!("{}", line),
                    Err(e) => tracing::debug!("Could not encode progress event: {}", e),
                }
            }
        }))
    } else {
        None
    };

    let result = coordinator.crawl(&cli.url).await;

    if let Some(handle) = observer {
        coordinator.progress().disconnect();
        if let Err(e) = handle.await {
            tracing::warn!("Progress observer task ended abnormally: {}", e);
        }
    }

    let outcome = result?;
    write_outcome(&outcome, cli.format, cli.output.as_deref()).map_err(CrawlError::from)?;

    if let Some(path) = &cli.output {
        tracing::info!("Wrote {} pages to {}", outcome.pages.len(), path.display());
    }

    // The text format already is the statistics
    if !cli.quiet && cli.format != OutputFormat::Text {
        print_statistics(&outcome.stats, outcome.termination);
    }

    Ok(())
}

/// Applies command-line flags on top of file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(engine) = cli.engine {
        config.renderer.engine = engine;
    }
    if let Some(secs) = cli.fetch_timeout {
        config.crawler.fetch_timeout_secs = secs;
    }
    if cli.skip_failures {
        config.crawler.on_render_failure = RenderFailurePolicy::Skip;
    }
}
