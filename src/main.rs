//! Sumi-Skim main entry point
//!
//! This is the command-line interface for the Sumi-Skim site skimmer.

use clap::Parser;
use std::path::PathBuf;
use sumi_skim::config::{load_config_with_hash, validate, Config};
use sumi_skim::crawler::{crawl_with_config, Strategy};
use sumi_skim::output::{print_statistics, publish, CrawlSummary};
use tracing_subscriber::EnvFilter;

/// Sumi-Skim: a bounded-depth site skimmer
///
/// Crawls a website from a seed URL, breadth-first or depth-first, and
/// collects the title and a short excerpt of every page it discovers.
#[derive(Parser, Debug)]
#[command(name = "sumi-skim")]
#[command(version)]
#[command(about = "A bounded-depth site skimmer", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (overrides the config file)
    #[arg(value_name = "URL")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum crawl depth
    #[arg(short, long)]
    depth: Option<u32>,

    /// Traversal order
    #[arg(short, long, value_enum)]
    strategy: Option<Strategy>,

    /// Maximum number of concurrent fetches
    #[arg(short = 'j', long)]
    max_concurrent: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Also record the title/excerpt of the seed and every other popped page
    #[arg(long)]
    store_popped: bool,

    /// Write records as JSON to this file
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Write a markdown summary to this file
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Export the run to this SQLite database
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv); -v also logs every crawled URL
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match resolve_config(&cli) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, config_hash, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_skim=info,warn"),
            1 => EnvFilter::new("sumi_skim=debug,info"),
            2 => EnvFilter::new("sumi_skim=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> Result<(Config, Option<String>), Box<dyn std::error::Error>> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => {
            let seed = cli
                .seed
                .clone()
                .ok_or("a seed URL is required when no config file is given")?;
            (Config::new(seed), None)
        }
    };

    if let Some(seed) = &cli.seed {
        config.crawler.seed = seed.clone();
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(strategy) = cli.strategy {
        config.crawler.strategy = strategy;
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.crawler.max_concurrent_fetches = max_concurrent;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.fetch_timeout = timeout;
    }
    if cli.store_popped {
        config.crawler.store_popped_pages = true;
    }
    if cli.verbose > 0 {
        config.crawler.verbose = true;
    }
    if let Some(path) = &cli.json {
        config.output.json_path = Some(path.display().to_string());
    }
    if let Some(path) = &cli.summary {
        config.output.summary_path = Some(path.display().to_string());
    }
    if let Some(path) = &cli.database {
        config.output.database_path = Some(path.display().to_string());
    }

    validate(&config)?;
    Ok((config, hash))
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Skim Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed: {}", config.crawler.seed);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Strategy: {}", config.crawler.strategy);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout);
    println!("  Store popped pages: {}", config.crawler.store_popped_pages);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    if let Some(contact) = &config.user_agent.contact_url {
        println!("  Contact URL: {}", contact);
    }

    println!("\nOutput:");
    let outputs = [
        ("JSON", &config.output.json_path),
        ("Summary", &config.output.summary_path),
        ("Database", &config.output.database_path),
    ];
    for (label, path) in outputs {
        if let Some(path) = path {
            println!("  {}: {}", label, path);
        }
    }
    if !config.output.has_sink() {
        println!("  JSON records to stdout");
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: Option<String>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = match crawl_with_config(&config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let summary = CrawlSummary::from_report(
        &report,
        &config.crawler.seed,
        config.crawler.strategy,
        config.crawler.max_depth,
        config_hash,
    );

    publish(&config.output, &summary)?;

    if !quiet {
        print_statistics(&report.stats, report.results.len());
    }

    Ok(())
}
