//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! summary structure they consume.

use crate::crawler::{CrawlReport, CrawlStats, PageEntry, Strategy};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything an output handler needs to describe a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub seed: String,
    pub strategy: Strategy,
    pub max_depth: u32,

    /// SHA-256 of the config file, when one was used
    pub config_hash: Option<String>,

    pub stats: CrawlStats,

    /// Records sorted by address
    pub pages: Vec<PageEntry>,
}

impl CrawlSummary {
    /// Builds a summary from a finished crawl
    pub fn from_report(
        report: &CrawlReport,
        seed: &str,
        strategy: Strategy,
        max_depth: u32,
        config_hash: Option<String>,
    ) -> Self {
        Self {
            seed: seed.to_string(),
            strategy,
            max_depth,
            config_hash,
            stats: report.stats.clone(),
            pages: report.results.entries(),
        }
    }

    /// Records with a non-empty title or excerpt
    pub fn pages_with_content(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| !p.title.is_empty() || !p.excerpt.is_empty())
            .count()
    }

    /// Calculates the fetch success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.stats.fetches_attempted == 0 {
            return 0.0;
        }
        let succeeded = self.stats.fetches_attempted - self.stats.fetch_failures;
        (succeeded as f64 / self.stats.fetches_attempted as f64) * 100.0
    }
}

/// Trait for output handler implementations
///
/// Handlers receive the summary once, after the crawl has finished.
pub trait OutputHandler {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Writes the summary to the handler's destination
    fn write(&self, summary: &CrawlSummary) -> OutputResult<()>;
}
