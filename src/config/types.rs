use crate::crawler::Strategy;
use serde::Deserialize;

/// Main configuration structure for Sumi-Skim
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Configuration with every option at its default
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig::new(seed),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Address the crawl starts from
    pub seed: String,

    /// Maximum depth to crawl from the seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Traversal order
    #[serde(default)]
    pub strategy: Strategy,

    /// Maximum number of concurrent page fetches
    #[serde(
        rename = "max-concurrent-fetches",
        default = "default_max_concurrent_fetches"
    )]
    pub max_concurrent_fetches: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "fetch-timeout", default = "default_fetch_timeout")]
    pub fetch_timeout: u64,

    /// Log every dequeued address at info level
    #[serde(default)]
    pub verbose: bool,

    /// Also record the (title, excerpt) of each popped page, the seed included
    ///
    /// Off by default: only pages reached through a fan-out are recorded.
    #[serde(rename = "store-popped-pages", default)]
    pub store_popped_pages: bool,
}

impl CrawlerConfig {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            max_depth: default_max_depth(),
            strategy: Strategy::default(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            fetch_timeout: default_fetch_timeout(),
            verbose: false,
            store_popped_pages: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Output configuration
///
/// Every sink is optional. With none set, the CLI prints JSON to stdout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON records file
    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,

    /// Path to the SQLite database file
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,
}

impl OutputConfig {
    pub fn has_sink(&self) -> bool {
        self.json_path.is_some() || self.summary_path.is_some() || self.database_path.is_some()
    }
}

fn default_max_depth() -> u32 {
    2
}

fn default_max_concurrent_fetches() -> usize {
    10
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_crawler_name() -> String {
    "SumiSkim".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
