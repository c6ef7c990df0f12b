//! Configuration module for Sumi-Skim
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Only `[crawler].seed` is required; everything else has a default.
//!
//! # Example
//!
//! ```no_run
//! use sumi_skim::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("skim.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::validate;
