//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns every piece of mutable crawl state: the frontier, the
//! visited set, the result cache and the run statistics. One instance drives
//! one crawl and is consumed by it, so independent crawls never share state.
//!
//! Each iteration pops one frontier entry, obtains its outbound links, and
//! fetches every new link concurrently under a shared permit pool. The whole
//! batch is drained before the next pop. Fetch tasks only read the visited
//! set; all writes happen here, between task completions.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetch;
use crate::crawler::frontier::{Frontier, FrontierEntry, VisitedSet};
use crate::crawler::parser::{parse_page, ParsedPage};
use crate::url::parse_seed;
use crate::{ConfigError, SkimError};
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::Semaphore;
use url::Url;

/// The (title, excerpt) summary kept for each crawled address
///
/// Both fields are empty when the fetch failed or the page had no
/// title/paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecord {
    pub title: String,
    pub excerpt: String,
}

/// A record together with its address, as handed to downstream consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub url: String,
    pub title: String,
    pub excerpt: String,
}

/// Mapping from address to page record, accumulated over a crawl
#[derive(Debug, Default)]
pub struct ResultCache {
    records: HashMap<Url, PageRecord>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record; a second write for the same address replaces the first
    pub fn insert(&mut self, url: Url, record: PageRecord) -> Option<PageRecord> {
        self.records.insert(url, record)
    }

    pub fn get(&self, url: &Url) -> Option<&PageRecord> {
        self.records.get(url)
    }

    /// Looks up a record by its address string
    pub fn get_str(&self, url: &str) -> Option<&PageRecord> {
        Url::parse(url).ok().and_then(|u| self.records.get(&u))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Url, &PageRecord)> {
        self.records.iter()
    }

    /// All records as entries sorted by address
    pub fn entries(&self) -> Vec<PageEntry> {
        let mut entries: Vec<PageEntry> = self
            .records
            .iter()
            .map(|(url, record)| PageEntry {
                url: url.to_string(),
                title: record.title.clone(),
                excerpt: record.excerpt.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.url.cmp(&b.url));
        entries
    }
}

/// Counters describing one crawl
#[derive(Debug, Clone)]
pub struct CrawlStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Frontier entries popped, including skipped ones
    pub entries_popped: u64,

    /// Entries dropped because the address was already visited
    pub skipped_visited: u64,

    /// Entries dropped because they exceed the depth limit
    pub skipped_depth: u64,

    /// Addresses marked visited
    pub pages_visited: u64,

    pub fetches_attempted: u64,
    pub fetch_failures: u64,
    pub records_written: u64,
}

impl CrawlStats {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            entries_popped: 0,
            skipped_visited: 0,
            skipped_depth: 0,
            pages_visited: 0,
            fetches_attempted: 0,
            fetch_failures: 0,
            records_written: 0,
        }
    }

    /// Wall-clock duration in seconds, once the crawl has finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

/// Everything a finished crawl produced
#[derive(Debug)]
pub struct CrawlReport {
    pub results: ResultCache,
    pub stats: CrawlStats,

    /// Entries that were actually processed, in pop order
    pub visit_order: Vec<FrontierEntry>,
}

/// Outcome of one fan-out task
struct FetchedPage {
    url: Url,
    succeeded: bool,
    page: ParsedPage,
}

/// Main crawler coordinator structure
pub struct Coordinator<F> {
    config: CrawlerConfig,
    fetcher: F,
    permits: Semaphore,
    frontier: Frontier,
    visited: VisitedSet,

    /// Links of pages fetched during a fan-out but not yet popped
    fetched: HashMap<Url, Vec<Url>>,

    results: ResultCache,
    stats: CrawlStats,
    visit_order: Vec<FrontierEntry>,
}

impl<F: Fetch> Coordinator<F> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fetcher` - Source of page content
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run, frontier holds the seed
    /// * `Err(SkimError)` - The concurrency bound is zero or the seed is invalid
    pub fn new(config: CrawlerConfig, fetcher: F) -> Result<Self, SkimError> {
        if config.max_concurrent_fetches == 0 {
            return Err(ConfigError::Validation(
                "max_concurrent_fetches must be at least 1".to_string(),
            )
            .into());
        }

        let seed = parse_seed(&config.seed)?;
        let frontier = Frontier::seeded(config.strategy, seed);
        let permits = Semaphore::new(config.max_concurrent_fetches);

        Ok(Self {
            config,
            fetcher,
            permits,
            frontier,
            visited: VisitedSet::new(),
            fetched: HashMap::new(),
            results: ResultCache::new(),
            stats: CrawlStats::new(),
            visit_order: Vec::new(),
        })
    }

    /// Runs the crawl until the frontier is exhausted
    pub async fn run(mut self) -> CrawlReport {
        tracing::info!(
            "Starting {} crawl of {} (max depth {}, {} concurrent fetches)",
            self.config.strategy,
            self.config.seed,
            self.config.max_depth,
            self.config.max_concurrent_fetches
        );

        while let Some(entry) = self.frontier.pop() {
            self.process_entry(entry).await;
        }

        self.stats.finished_at = Some(Utc::now());
        tracing::info!(
            "Crawl complete: {} pages visited, {} records, {} fetch failures",
            self.visited.len(),
            self.results.len(),
            self.stats.fetch_failures
        );

        CrawlReport {
            results: self.results,
            stats: self.stats,
            visit_order: self.visit_order,
        }
    }

    /// Handles one popped frontier entry, including its fan-out batch
    async fn process_entry(&mut self, entry: FrontierEntry) {
        self.stats.entries_popped += 1;

        if self.visited.contains(&entry.url) {
            tracing::trace!("Skipping visited {}", entry.url);
            self.stats.skipped_visited += 1;
            return;
        }
        if entry.depth > self.config.max_depth {
            tracing::trace!("Skipping {} at depth {}", entry.url, entry.depth);
            self.stats.skipped_depth += 1;
            return;
        }

        if self.config.verbose {
            tracing::info!("Crawling {} (depth {})", entry.url, entry.depth);
        } else {
            tracing::debug!("Crawling {} (depth {})", entry.url, entry.depth);
        }

        self.visited.insert(entry.url.clone());
        self.stats.pages_visited += 1;
        self.visit_order.push(entry.clone());

        let links = self.links_of(&entry.url).await;

        let child_depth = entry.depth + 1;
        if child_depth > self.config.max_depth {
            tracing::trace!(
                "Not expanding {}: children would exceed max depth",
                entry.url
            );
            return;
        }

        // Pages fetched by an earlier batch are re-queued without a second fetch.
        let (already_fetched, to_fetch): (Vec<Url>, Vec<Url>) = links
            .into_iter()
            .filter(|link| !self.visited.contains(link))
            .partition(|link| self.fetched.contains_key(link));

        for link in already_fetched {
            self.frontier.push(link, child_depth);
        }

        let fetcher = &self.fetcher;
        let permits = &self.permits;
        let visited = &self.visited;
        let mut batch: FuturesUnordered<_> = to_fetch
            .into_iter()
            .map(move |link| fetch_page(fetcher, permits, visited, link))
            .collect();

        while let Some(fetched) = batch.next().await {
            self.stats.fetches_attempted += 1;
            if !fetched.succeeded {
                self.stats.fetch_failures += 1;
            }

            self.results
                .insert(fetched.url.clone(), fetched.page.record());
            self.stats.records_written += 1;
            self.fetched
                .insert(fetched.url.clone(), fetched.page.links);
            self.frontier.push(fetched.url, child_depth);
        }
    }

    /// Outbound links of a page being visited
    ///
    /// Uses the links captured when the page was fetched as part of an
    /// earlier batch; otherwise fetches it now.
    async fn links_of(&mut self, url: &Url) -> Vec<Url> {
        if let Some(mut links) = self.fetched.remove(url) {
            links.retain(|link| !self.visited.contains(link));
            return links;
        }

        let content = fetch_with_permit(&self.fetcher, &self.permits, url).await;
        self.stats.fetches_attempted += 1;
        if content.is_none() {
            self.stats.fetch_failures += 1;
        }

        let page = parse_page(content.as_deref(), url, &self.visited);
        if self.config.store_popped_pages {
            self.results.insert(url.clone(), page.record());
            self.stats.records_written += 1;
        }
        page.links
    }
}

/// Fetches and parses one page for a fan-out batch
async fn fetch_page<F: Fetch + ?Sized>(
    fetcher: &F,
    permits: &Semaphore,
    visited: &VisitedSet,
    url: Url,
) -> FetchedPage {
    let content = fetch_with_permit(fetcher, permits, &url).await;
    let page = parse_page(content.as_deref(), &url, visited);

    FetchedPage {
        url,
        succeeded: content.is_some(),
        page,
    }
}

/// Fetches while holding one permit; the permit is released on every exit path
async fn fetch_with_permit<F: Fetch + ?Sized>(
    fetcher: &F,
    permits: &Semaphore,
    url: &Url,
) -> Option<String> {
    let _permit = match permits.acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            tracing::warn!("Permit pool closed before fetching {}: {}", url, e);
            return None;
        }
    };

    fetcher.fetch(url).await
}
