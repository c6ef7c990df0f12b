//! SQLite-based output handler implementation
//!
//! Each crawl becomes one row in `runs`; its records go to `pages` keyed by
//! run and address. Repeated exports into the same file accumulate runs.

use crate::output::traits::{CrawlSummary, OutputHandler, OutputResult};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// SQL schema for the export database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    seed TEXT NOT NULL,
    strategy TEXT NOT NULL,
    max_depth INTEGER NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT,
    pages_visited INTEGER NOT NULL,
    fetches_attempted INTEGER NOT NULL,
    fetch_failures INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    excerpt TEXT NOT NULL,
    UNIQUE(run_id, url)
);

CREATE INDEX IF NOT EXISTS idx_pages_url ON pages(url);
"#;

/// Exports crawl results to a SQLite database file
pub struct SqliteOutput {
    path: PathBuf,
}

impl SqliteOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for SqliteOutput {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn write(&self, summary: &CrawlSummary) -> OutputResult<()> {
        let mut conn = open_database(&self.path)?;
        write_summary(&mut conn, summary)?;
        Ok(())
    }
}

/// Opens (or creates) the export database and ensures the schema exists
pub fn open_database(path: &Path) -> OutputResult<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(conn)
}

/// Inserts one run and all of its records in a single transaction
///
/// # Returns
///
/// The id of the inserted run
pub fn write_summary(conn: &mut Connection, summary: &CrawlSummary) -> OutputResult<i64> {
    let stats = &summary.stats;
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO runs (seed, strategy, max_depth, started_at, finished_at, config_hash,
                           pages_visited, fetches_attempted, fetch_failures)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            summary.seed,
            summary.strategy.as_str(),
            summary.max_depth,
            stats.started_at.to_rfc3339(),
            stats.finished_at.map(|t| t.to_rfc3339()),
            summary.config_hash,
            stats.pages_visited as i64,
            stats.fetches_attempted as i64,
            stats.fetch_failures as i64,
        ],
    )?;
    let run_id = tx.last_insert_rowid();

    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO pages (run_id, url, title, excerpt) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for page in &summary.pages {
            stmt.execute(params![run_id, page.url, page.title, page.excerpt])?;
        }
    }

    tx.commit()?;
    tracing::debug!(
        "Exported run {} with {} pages to SQLite",
        run_id,
        summary.pages.len()
    );
    Ok(run_id)
}
