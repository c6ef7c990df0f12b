//! JSON export of crawl records
//!
//! The file holds a single array of `{url, title, excerpt}` objects sorted by
//! address. This is the shape downstream scoring stages read.

use crate::output::traits::{CrawlSummary, OutputHandler, OutputResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes records as a pretty-printed JSON array
pub struct JsonOutput {
    path: PathBuf,
}

impl JsonOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for JsonOutput {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, summary: &CrawlSummary) -> OutputResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &summary.pages)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Formats the records as the same JSON array, for printing
pub fn format_json_records(summary: &CrawlSummary) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(&summary.pages)?)
}
