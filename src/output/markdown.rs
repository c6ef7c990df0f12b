//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl: run
//! information, counters, and one section per recorded page.

use crate::output::traits::{CrawlSummary, OutputHandler, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Excerpts longer than this are cut in the summary
const MAX_EXCERPT_CHARS: usize = 300;

/// Writes the markdown summary to a file
pub struct MarkdownOutput {
    path: PathBuf,
}

impl MarkdownOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for MarkdownOutput {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn write(&self, summary: &CrawlSummary) -> OutputResult<()> {
        generate_markdown_summary(summary, &self.path)
    }
}

/// Generates a markdown summary from crawl results
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();
    let stats = &summary.stats;

    md.push_str("# Sumi-Skim Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", summary.seed));
    md.push_str(&format!("- **Strategy**: {}\n", summary.strategy));
    md.push_str(&format!("- **Max Depth**: {}\n", summary.max_depth));
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    if let Some(finished) = stats.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = stats.duration_seconds() {
        md.push_str(&format!("- **Duration**: {:.2} seconds\n", duration));
    }
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Counters
    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages Visited | {} |\n", stats.pages_visited));
    md.push_str(&format!("| Records | {} |\n", summary.pages.len()));
    md.push_str(&format!(
        "| Records With Content | {} |\n",
        summary.pages_with_content()
    ));
    md.push_str(&format!("| Fetches | {} |\n", stats.fetches_attempted));
    md.push_str(&format!("| Fetch Failures | {} |\n", stats.fetch_failures));
    md.push_str(&format!(
        "| Skipped (already visited) | {} |\n",
        stats.skipped_visited
    ));
    md.push_str(&format!(
        "| Skipped (depth exceeded) | {} |\n\n",
        stats.skipped_depth
    ));
    md.push_str(&format!(
        "Fetch success rate: {:.2}%\n\n",
        summary.success_rate()
    ));

    // Pages
    md.push_str("## Pages\n\n");
    if summary.pages.is_empty() {
        md.push_str("_No pages recorded._\n");
    }
    for page in &summary.pages {
        let heading = if page.title.is_empty() {
            "(untitled)"
        } else {
            page.title.as_str()
        };
        md.push_str(&format!("### {}\n\n", escape_markdown(heading)));
        md.push_str(&format!("<{}>\n\n", page.url));
        if !page.excerpt.is_empty() {
            md.push_str(&format!(
                "> {}\n\n",
                escape_markdown(&truncate(page.excerpt.trim(), MAX_EXCERPT_CHARS))
            ));
        }
    }

    md
}

/// Cuts text to at most `max_chars` characters, appending an ellipsis
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

/// Flattens newlines and escapes characters that would change the layout
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\r' => escaped.push(' '),
            '*' | '_' | '`' | '#' | '[' | ']' | '<' | '>' | '|' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
