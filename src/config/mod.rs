//! Configuration module for MediaWiki-Crawl
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, plus validation of the base URI passed on the
//! command line.
//!
//! # Example
//!
//! ```no_run
//! use mediawiki_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawl starts at: {:?}", config.crawl.start_cursor);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClientConfig, Config, CrawlConfig, OutputConfig, DEFAULT_BACKOFF_SEED, DEFAULT_DELAY_UNIT_MS,
    DEFAULT_START_CURSOR, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_base_uri};
