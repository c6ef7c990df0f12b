//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sumi_skim::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use sumi_skim::crawler::{crawl, crawl_with_config, Coordinator, Fetch, Strategy};
use sumi_skim::output::{write_outputs, CrawlSummary};
use sumi_skim::{ConfigError, SkimError};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Builds a page with a title, one paragraph and the given links
fn page(title: &str, body: &str, links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>{}</p>{}</body></html>",
        title, body, anchors
    )
}

/// Serves the three-page site used by the traversal tests:
/// `/` links to `/a` and `/b`, `/a` links to `/c`.
async fn three_page_site() -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        page(
            "Home",
            "Welcome",
            &[format!("{}/a", base), format!("{}/b", base)],
        ),
    )
    .await;
    mount_page(&server, "/a", page("A", "About A", &[format!("{}/c", base)])).await;
    mount_page(&server, "/b", page("B", "About B", &[])).await;
    mount_page(&server, "/c", page("C", "About C", &[])).await;

    server
}

fn test_config(seed: String) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth: 2,
            max_concurrent_fetches: 4,
            fetch_timeout: 5,
            ..CrawlerConfig::new(seed)
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
        output: OutputConfig::default(),
    }
}

#[tokio::test]
async fn test_breadth_first_crawl_respects_depth() {
    let server = three_page_site().await;
    let base = server.uri();

    let results = crawl(&format!("{}/", base), 2, Strategy::BreadthFirst, 4)
        .await
        .expect("crawl should succeed");

    assert_eq!(results.len(), 2);

    let a = results.get_str(&format!("{}/a", base)).expect("A recorded");
    assert_eq!(a.title, "A");
    assert_eq!(a.excerpt, "About A");

    let b = results.get_str(&format!("{}/b", base)).expect("B recorded");
    assert_eq!(b.title, "B");

    assert!(results.get_str(&format!("{}/c", base)).is_none());
    assert!(results.get_str(&format!("{}/", base)).is_none());
}

#[tokio::test]
async fn test_depth_first_crawl_reaches_one_level_deeper() {
    let server = three_page_site().await;
    let base = server.uri();

    let results = crawl(&format!("{}/", base), 2, Strategy::DepthFirst, 4)
        .await
        .expect("crawl should succeed");

    assert_eq!(results.len(), 3);
    assert_eq!(
        results.get_str(&format!("{}/c", base)).unwrap().title,
        "C"
    );
}

#[tokio::test]
async fn test_failed_link_gets_empty_record() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        page("Home", "Welcome", &[format!("{}/missing", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let report = crawl_with_config(&test_config(format!("{}/", base)))
        .await
        .expect("crawl should succeed");

    let missing = report
        .results
        .get_str(&format!("{}/missing", base))
        .expect("failed page still recorded");
    assert!(missing.title.is_empty());
    assert!(missing.excerpt.is_empty());
    assert_eq!(report.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_unreachable_seed_yields_empty_results() {
    let server = MockServer::start().await;
    let base = server.uri();

    let results = crawl(&format!("{}/", base), 3, Strategy::BreadthFirst, 2)
        .await
        .expect("a failed seed fetch is not an error");

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_store_popped_pages_records_seed() {
    let server = three_page_site().await;
    let base = server.uri();

    let mut config = test_config(format!("{}/", base));
    config.crawler.store_popped_pages = true;

    let report = crawl_with_config(&config)
        .await
        .expect("crawl should succeed");

    let seed = report
        .results
        .get_str(&format!("{}/", base))
        .expect("seed recorded");
    assert_eq!(seed.title, "Home");
    assert_eq!(seed.excerpt, "Welcome");
}

#[tokio::test]
async fn test_relative_links_are_resolved() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/docs/",
        page(
            "Docs",
            "Index",
            &["intro".to_string(), "/about".to_string()],
        ),
    )
    .await;
    mount_page(&server, "/docs/intro", page("Intro", "Start here", &[])).await;
    mount_page(&server, "/about", page("About", "Us", &[])).await;

    let results = crawl(&format!("{}/docs/", base), 2, Strategy::BreadthFirst, 4)
        .await
        .expect("crawl should succeed");

    assert_eq!(
        results
            .get_str(&format!("{}/docs/intro", base))
            .unwrap()
            .title,
        "Intro"
    );
    assert_eq!(
        results.get_str(&format!("{}/about", base)).unwrap().title,
        "About"
    );
}

#[tokio::test]
async fn test_cyclic_site_fetches_each_page_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    let root = format!("{}/", base);
    let a = format!("{}/a", base);
    let b = format!("{}/b", base);

    for strategy in [Strategy::BreadthFirst, Strategy::DepthFirst] {
        // Fresh mocks per run so each expectation counts one crawl
        server.reset().await;
        for (route, links) in [
            ("/", vec![a.clone()]),
            ("/a", vec![root.clone(), b.clone()]),
            ("/b", vec![a.clone(), root.clone()]),
        ] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_string(page(
                    route,
                    "loop",
                    &links,
                )))
                .expect(1)
                .mount(&server)
                .await;
        }

        let results = crawl(&root, 5, strategy, 2)
            .await
            .expect("crawl should succeed");
        assert_eq!(results.len(), 2, "{} crawl", strategy);

        server.verify().await;
    }
}

#[tokio::test]
async fn test_zero_concurrency_is_rejected() {
    let result = crawl("https://example.com/", 2, Strategy::BreadthFirst, 0).await;
    assert!(matches!(
        result,
        Err(SkimError::Config(ConfigError::Validation(_)))
    ));
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let result = crawl("not a url", 2, Strategy::BreadthFirst, 2).await;
    assert!(matches!(
        result,
        Err(SkimError::Config(ConfigError::InvalidUrl(_)))
    ));
}

/// Serves a star-shaped site from memory while tracking concurrent fetches
struct SlowFetcher {
    base: Url,
    children: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl Fetch for SlowFetcher {
    async fn fetch(&self, url: &Url) -> Option<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if url == &self.base {
            let links: Vec<String> = (0..self.children)
                .map(|i| format!("/page{}", i))
                .collect();
            Some(page("Hub", "Many links", &links))
        } else {
            Some(page(url.path(), "Leaf", &[]))
        }
    }
}

#[tokio::test]
async fn test_concurrent_fetches_stay_within_bound() {
    let base = Url::parse("https://hub.example/").unwrap();
    let fetcher = Arc::new(SlowFetcher {
        base: base.clone(),
        children: 8,
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });

    let config = CrawlerConfig {
        max_depth: 2,
        max_concurrent_fetches: 3,
        ..CrawlerConfig::new(base.as_str())
    };
    let report = Coordinator::new(config, Arc::clone(&fetcher))
        .expect("valid config")
        .run()
        .await;

    assert_eq!(report.results.len(), 8);

    let peak = fetcher.peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak concurrency was {}", peak);
    assert!(peak >= 2, "fan-out should overlap fetches, peak was {}", peak);
    assert_eq!(fetcher.in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_crawl_writes_configured_outputs() {
    let server = three_page_site().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("records.json");
    let summary_path = dir.path().join("summary.md");
    let db_path = dir.path().join("runs.db");

    let mut config = test_config(format!("{}/", base));
    config.output = OutputConfig {
        json_path: Some(json_path.display().to_string()),
        summary_path: Some(summary_path.display().to_string()),
        database_path: Some(db_path.display().to_string()),
    };

    let report = crawl_with_config(&config)
        .await
        .expect("crawl should succeed");
    let summary = CrawlSummary::from_report(
        &report,
        &config.crawler.seed,
        config.crawler.strategy,
        config.crawler.max_depth,
        None,
    );
    write_outputs(&config.output, &summary).expect("outputs written");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json.as_array().map(|a| a.len()), Some(2));

    let markdown = std::fs::read_to_string(&summary_path).unwrap();
    assert!(markdown.contains("### A"));

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let pages: i64 = conn
        .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))
        .unwrap();
    assert_eq!(pages, 2);
}
