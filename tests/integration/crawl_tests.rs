//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full crawls
//! through the plain HTTP rendering engine.

use ripple_scrape::config::{Config, Engine, RenderFailurePolicy};
use ripple_scrape::crawler::{crawl, Coordinator, HttpRenderer, PageResult, Termination};
use ripple_scrape::output::{format_json, ScrapeResponse};
use ripple_scrape::{CrawlError, RenderErrorKind};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(format!("<html><body>{}</body></html>", body))
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Default configuration with the plain HTTP engine selected
fn http_config() -> Config {
    let mut config = Config::default();
    config.renderer.engine = Engine::Http;
    config
}

fn coordinator(config: Config) -> Coordinator {
    let renderer = HttpRenderer::new(&config.renderer).expect("Failed to build HTTP renderer");
    Coordinator::new(config, Arc::new(renderer)).expect("Test configuration should be valid")
}

/// Mounts a small site:
///
/// ```text
/// /        -> /about, /blog, external
/// /about   -> /, /team
/// /blog    -> /about
/// /team    -> (none)
/// ```
async fn small_site() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<h1>Home</h1><p>Welcome</p>
           <a href="/about">About</a>
           <a href="/blog">Blog</a>
           <a href="https://external.example/x">Elsewhere</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/about",
        r#"<h2>About</h2><a href="/">Home</a><a href="/team">Team</a>"#,
    )
    .await;
    mount_page(&server, "/blog", r#"<p>Posts</p><a href="/about">About</a>"#).await;
    mount_page(&server, "/team", "<li>Ada</li><li>Grace</li>").await;

    server
}

#[tokio::test]
async fn test_full_crawl_single_origin() {
    let server = small_site().await;
    let base = server.uri();
    let seed = format!("{}/", base);

    let outcome = coordinator(http_config())
        .crawl(&seed)
        .await
        .expect("Crawl should succeed");

    let visited: Vec<&str> = outcome.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        visited,
        vec![
            seed.clone(),
            format!("{}/about", base),
            format!("{}/blog", base),
            format!("{}/team", base),
        ]
    );

    assert_eq!(outcome.pages[0].text, "Home\nWelcome");
    assert_eq!(outcome.pages[3].text, "Ada\nGrace");
    assert_eq!(outcome.termination, Termination::FrontierExhausted);
    assert_eq!(outcome.origin, base);
    assert_eq!(outcome.stats.links_out_of_scope, 1);

    // Each page fetched exactly once, external host never contacted
    let requests = server.received_requests().await.expect("Recording enabled");
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_error_pages_are_extracted_like_any_page() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(
        &server,
        "/",
        r#"<p>Home</p><a href="/gone">Gone</a><a href="/kept">Kept</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("content-type", "text/html")
                .set_body_string("<h1>Not found</h1>"),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/kept", "<p>Still here</p>").await;

    let outcome = coordinator(http_config())
        .crawl(&format!("{}/", base))
        .await
        .expect("A 404 page must not abort the crawl");

    assert_eq!(
        outcome.pages,
        vec![
            PageResult {
                url: format!("{}/", base),
                text: "Home".to_string()
            },
            PageResult {
                url: format!("{}/gone", base),
                text: "Not found".to_string()
            },
            PageResult {
                url: format!("{}/kept", base),
                text: "Still here".to_string()
            },
        ]
    );
    assert!(outcome.stats.failed_urls.is_empty());
}

#[tokio::test]
async fn test_http_errors_fail_the_crawl_when_enabled() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<p>Home</p><a href="/gone">Gone</a>"#).await;

    let mut config = http_config();
    config.renderer.fail_on_http_error = true;

    let err = coordinator(config)
        .crawl(&format!("{}/", server.uri()))
        .await
        .expect_err("A 404 should abort the crawl");

    match &err {
        CrawlError::Render(render) => {
            assert!(render.url.ends_with("/gone"));
            assert!(matches!(render.kind, RenderErrorKind::HttpStatus(404)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.public_message(), "An unexpected error occurred.");
}

#[tokio::test]
async fn test_unreachable_server_fails_the_crawl() {
    // A non-pooled server actually stops listening when dropped.
    let server = MockServer::builder().start().await;
    let seed = format!("{}/", server.uri());
    drop(server);

    let err = coordinator(http_config())
        .crawl(&seed)
        .await
        .expect_err("Connection failures are render failures");

    match err {
        CrawlError::Render(render) => {
            assert!(matches!(render.kind, RenderErrorKind::Network(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_skip_policy_collects_remaining_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<p>Home</p><a href="/gone">Gone</a><a href="/kept">Kept</a>"#,
    )
    .await;
    mount_page(&server, "/kept", "<p>Still here</p>").await;

    let mut config = http_config();
    config.renderer.fail_on_http_error = true;
    config.crawler.on_render_failure = RenderFailurePolicy::Skip;

    let outcome = coordinator(config)
        .crawl(&format!("{}/", server.uri()))
        .await
        .expect("Skip policy should not abort");

    assert_eq!(outcome.pages.len(), 2);
    assert_eq!(outcome.pages[1].text, "Still here");
    assert_eq!(outcome.stats.failed_urls, vec![format!("{}/gone", server.uri())]);
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(&server, "/", "<h1>Back up</h1>").await;

    let mut config = http_config();
    config.renderer.fail_on_http_error = true;
    config.crawler.on_render_failure = RenderFailurePolicy::Skip;
    config.crawler.render_retries = 1;

    let outcome = coordinator(config)
        .crawl(&format!("{}/", server.uri()))
        .await
        .expect("Retry should recover");

    assert_eq!(outcome.pages[0].text, "Back up");
    assert_eq!(outcome.stats.render_retries, 1);
}

#[tokio::test]
async fn test_page_ceiling() {
    let server = small_site().await;

    let mut config = http_config();
    config.crawler.max_pages = 2;

    let outcome = coordinator(config)
        .crawl(&format!("{}/", server.uri()))
        .await
        .expect("Crawl should succeed");

    assert_eq!(outcome.pages.len(), 2);
    assert_eq!(outcome.termination, Termination::PageCeiling);

    let requests = server.received_requests().await.expect("Recording enabled");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_progress_observer_sees_each_visit() {
    let server = small_site().await;
    let coordinator = coordinator(http_config());
    let mut rx = coordinator.progress().connect();

    let outcome = coordinator
        .crawl(&format!("{}/", server.uri()))
        .await
        .expect("Crawl should succeed");
    coordinator.progress().disconnect();

    let mut seen = Vec::new();
    while let Some(event) = rx.recv().await {
        seen.push(event.current_url);
    }

    let visited: Vec<String> = outcome.pages.into_iter().map(|p| p.url).collect();
    assert_eq!(seen, visited);
}

#[tokio::test]
async fn test_crawl_without_observer() {
    let server = small_site().await;

    let outcome = crawl(http_config(), &format!("{}/", server.uri()))
        .await
        .expect("Crawl should succeed");

    assert_eq!(outcome.pages.len(), 4);
}

#[tokio::test]
async fn test_empty_seed_is_rejected() {
    let err = crawl(http_config(), "  ")
        .await
        .expect_err("Empty seed must be rejected");

    assert_eq!(err.public_message(), "URL is required");
}

#[tokio::test]
async fn test_response_envelope() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<h1>Hi</h1>").await;
    let seed = format!("{}/", server.uri());

    let outcome = crawl(http_config(), &seed)
        .await
        .expect("Crawl should succeed");
    let body = format_json(&outcome.pages).expect("Encoding should succeed");
    let parsed: ScrapeResponse = serde_json::from_str(&body).expect("Valid JSON");

    assert_eq!(
        parsed.scraped_data,
        vec![PageResult {
            url: seed,
            text: "Hi".to_string()
        }]
    );
}
