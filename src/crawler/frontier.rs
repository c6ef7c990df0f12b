//! Crawl frontier and visited-set tracking
//!
//! The frontier holds discovered addresses awaiting a visit, each tagged with
//! the depth it was discovered at. Traversal order is a property of the
//! frontier: breadth-first pops the oldest entry, depth-first the newest.
//! Duplicates are allowed on push; the orchestrator drops them at pop time by
//! consulting the visited set.

use serde::Deserialize;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Traversal order policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// FIFO frontier
    #[default]
    #[serde(alias = "bfs")]
    #[value(alias = "bfs")]
    BreadthFirst,

    /// LIFO frontier
    #[serde(alias = "dfs")]
    #[value(alias = "dfs")]
    DepthFirst,
}

impl Strategy {
    /// Depth assigned to the seed entry
    ///
    /// Breadth-first counts the seed as depth 1, depth-first as depth 0.
    pub fn seed_depth(&self) -> u32 {
        match self {
            Self::BreadthFirst => 1,
            Self::DepthFirst => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BreadthFirst => "breadth-first",
            Self::DepthFirst => "depth-first",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An address waiting to be visited, with its discovery depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

/// Work queue of discovered addresses
#[derive(Debug)]
pub struct Frontier {
    strategy: Strategy,
    entries: VecDeque<FrontierEntry>,
}

impl Frontier {
    /// Creates an empty frontier with the given traversal order
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            entries: VecDeque::new(),
        }
    }

    /// Creates a frontier holding only the seed at the strategy's seed depth
    pub fn seeded(strategy: Strategy, seed: Url) -> Self {
        let mut frontier = Self::new(strategy);
        frontier.push(seed, strategy.seed_depth());
        frontier
    }

    /// Appends an entry; no deduplication happens here
    pub fn push(&mut self, url: Url, depth: u32) {
        self.entries.push_back(FrontierEntry { url, depth });
    }

    /// Removes the next entry according to the traversal order
    ///
    /// Returns `None` once the frontier is exhausted, which ends the crawl.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        match self.strategy {
            Strategy::BreadthFirst => self.entries.pop_front(),
            Strategy::DepthFirst => self.entries.pop_back(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Addresses already popped and processed
///
/// Grows monotonically. The orchestrator's pop-time check is the
/// authoritative dedup gate; the parser's link filter reads the same set as a
/// best-effort shortcut.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: HashSet<Url>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.inner.contains(url)
    }

    /// Marks an address visited, returning false if it already was
    pub fn insert(&mut self, url: Url) -> bool {
        self.inner.insert(url)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://example.com{}", path)).unwrap()
    }

    #[test]
    fn test_seed_depths() {
        assert_eq!(Strategy::BreadthFirst.seed_depth(), 1);
        assert_eq!(Strategy::DepthFirst.seed_depth(), 0);
        assert_eq!(Strategy::default(), Strategy::BreadthFirst);
    }

    #[test]
    fn test_seeded_frontier() {
        let mut frontier = Frontier::seeded(Strategy::DepthFirst, url("/"));
        assert_eq!(frontier.len(), 1);

        let entry = frontier.pop().unwrap();
        assert_eq!(entry.url, url("/"));
        assert_eq!(entry.depth, 0);
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_breadth_first_is_fifo() {
        let mut frontier = Frontier::new(Strategy::BreadthFirst);
        frontier.push(url("/a"), 1);
        frontier.push(url("/b"), 2);
        frontier.push(url("/c"), 3);

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop())
            .map(|e| e.url.path().to_string())
            .collect();
        assert_eq!(order, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_depth_first_is_lifo() {
        let mut frontier = Frontier::new(Strategy::DepthFirst);
        frontier.push(url("/a"), 1);
        frontier.push(url("/b"), 2);
        frontier.push(url("/c"), 3);

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop())
            .map(|e| e.url.path().to_string())
            .collect();
        assert_eq!(order, vec!["/c", "/b", "/a"]);
    }

    #[test]
    fn test_push_keeps_duplicates() {
        let mut frontier = Frontier::new(Strategy::BreadthFirst);
        frontier.push(url("/a"), 1);
        frontier.push(url("/a"), 2);

        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.pop().unwrap().depth, 1);
        assert_eq!(frontier.pop().unwrap().depth, 2);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_visited_set() {
        let mut visited = VisitedSet::new();
        assert!(visited.is_empty());

        assert!(visited.insert(url("/a")));
        assert!(!visited.insert(url("/a")));
        assert!(visited.contains(&url("/a")));
        assert!(!visited.contains(&url("/b")));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_strategy_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: Strategy,
        }

        let parsed: Wrapper = toml::from_str(r#"strategy = "depth-first""#).unwrap();
        assert_eq!(parsed.strategy, Strategy::DepthFirst);

        let parsed: Wrapper = toml::from_str(r#"strategy = "bfs""#).unwrap();
        assert_eq!(parsed.strategy, Strategy::BreadthFirst);
    }
}
