//! Console statistics for a finished crawl

use crate::crawler::CrawlStats;

/// Formats crawl statistics as plain text lines
pub fn format_statistics(stats: &CrawlStats, records: usize) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");
    out.push_str(&format!("Pages visited:       {}\n", stats.pages_visited));
    out.push_str(&format!("Records:             {}\n", records));
    out.push_str(&format!("Fetches:             {}\n", stats.fetches_attempted));
    out.push_str(&format!("Fetch failures:      {}\n", stats.fetch_failures));
    out.push_str(&format!("Frontier pops:       {}\n", stats.entries_popped));
    out.push_str(&format!("  already visited:   {}\n", stats.skipped_visited));
    out.push_str(&format!("  beyond max depth:  {}\n", stats.skipped_depth));
    if let Some(duration) = stats.duration_seconds() {
        out.push_str(&format!("Duration:            {:.2}s\n", duration));
    }

    out
}

/// Prints crawl statistics to stderr, keeping stdout free for records
pub fn print_statistics(stats: &CrawlStats, records: usize) {
    eprint!("{}", format_statistics(stats, records));
}
