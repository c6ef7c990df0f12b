//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a per-request timeout
//! - HTML parsing into (title, excerpt, links)
//! - Frontier ordering and visited-set tracking
//! - Overall crawl coordination under a global concurrency cap

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{Coordinator, CrawlReport, CrawlStats, PageEntry, PageRecord, ResultCache};
pub use fetcher::{build_http_client, fetch_url, user_agent_string, Fetch, FetchResult, HttpFetcher};
pub use frontier::{Frontier, FrontierEntry, Strategy, VisitedSet};
pub use parser::{parse_html, parse_page, ParsedPage, EXCERPT_PARAGRAPHS};

use crate::config::{Config, CrawlerConfig, UserAgentConfig};
use crate::SkimError;
use std::time::Duration;

/// Crawls from `seed` and returns the record of every discovered page
///
/// This is the main entry point for a crawl with default user agent and
/// timeout. The seed page itself is not recorded; see
/// [`CrawlerConfig::store_popped_pages`].
///
/// # Arguments
///
/// * `seed` - Absolute address to start from
/// * `max_depth` - Depth limit (seed is depth 1 breadth-first, 0 depth-first)
/// * `strategy` - Traversal order
/// * `max_concurrent_fetches` - Size of the permit pool, must be at least 1
///
/// # Returns
///
/// * `Ok(ResultCache)` - Crawl completed
/// * `Err(SkimError)` - The arguments were rejected before any fetch
///
/// # Example
///
/// ```no_run
/// use sumi_skim::crawler::{crawl, Strategy};
///
/// # async fn example() -> Result<(), sumi_skim::SkimError> {
/// let results = crawl("https://example.com/", 2, Strategy::BreadthFirst, 10).await?;
/// for (url, record) in results.iter() {
///     println!("{} - {}", url, record.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    seed: &str,
    max_depth: u32,
    strategy: Strategy,
    max_concurrent_fetches: usize,
) -> Result<ResultCache, SkimError> {
    let config = CrawlerConfig {
        max_depth,
        strategy,
        max_concurrent_fetches,
        ..CrawlerConfig::new(seed)
    };

    let report = run_crawl(&config, &UserAgentConfig::default()).await?;
    Ok(report.results)
}

/// Runs a crawl described by a full configuration
pub async fn crawl_with_config(config: &Config) -> Result<CrawlReport, SkimError> {
    run_crawl(&config.crawler, &config.user_agent).await
}

/// Blocking wrapper around [`crawl`] for callers without a runtime
pub fn crawl_blocking(
    seed: &str,
    max_depth: u32,
    strategy: Strategy,
    max_concurrent_fetches: usize,
) -> Result<ResultCache, SkimError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(crawl(seed, max_depth, strategy, max_concurrent_fetches))
}

async fn run_crawl(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<CrawlReport, SkimError> {
    crawler.validate()?;

    let fetcher = HttpFetcher::new(user_agent, Duration::from_secs(crawler.fetch_timeout))?;
    let coordinator = Coordinator::new(crawler.clone(), fetcher)?;
    Ok(coordinator.run().await)
}
