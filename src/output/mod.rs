//! Output module for exporting crawl results
//!
//! This module handles:
//! - Exporting records as JSON for downstream scoring stages
//! - Generating markdown summaries of crawl results
//! - Recording runs and records in SQLite
//! - Printing crawl statistics

mod json;
mod markdown;
mod sqlite_output;
pub mod stats;
mod traits;

pub use json::{format_json_records, JsonOutput};
pub use markdown::{format_markdown_summary, generate_markdown_summary, MarkdownOutput};
pub use sqlite_output::{open_database, write_summary, SqliteOutput};
pub use stats::{format_statistics, print_statistics};
pub use traits::{CrawlSummary, OutputError, OutputHandler, OutputResult};

use crate::config::OutputConfig;
use crate::SkimError;

/// Builds one handler per configured sink
pub fn build_handlers(config: &OutputConfig) -> Vec<Box<dyn OutputHandler>> {
    let mut handlers: Vec<Box<dyn OutputHandler>> = Vec::new();

    if let Some(path) = &config.json_path {
        handlers.push(Box::new(JsonOutput::new(path)));
    }
    if let Some(path) = &config.summary_path {
        handlers.push(Box::new(MarkdownOutput::new(path)));
    }
    if let Some(path) = &config.database_path {
        handlers.push(Box::new(SqliteOutput::new(path)));
    }

    handlers
}

/// Writes the summary to every configured sink
///
/// Stops at the first failing sink.
pub fn write_outputs(config: &OutputConfig, summary: &CrawlSummary) -> OutputResult<()> {
    for handler in build_handlers(config) {
        tracing::info!("Writing {} output", handler.name());
        handler.write(summary)?;
    }
    Ok(())
}

/// Hands the summary to its consumers
///
/// Writes every configured sink, or prints the JSON records to stdout when
/// no sink is configured.
pub fn publish(config: &OutputConfig, summary: &CrawlSummary) -> Result<(), SkimError> {
    if config.has_sink() {
        write_outputs(config, summary)?;
    } else {
        println!("{}", format_json_records(summary)?);
    }
    Ok(())
}
