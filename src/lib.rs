//! MediaWiki-Crawl: an image harvester for MediaWiki sites
//!
//! This crate walks the `list=allimages` listing of a MediaWiki `api.php`
//! endpoint page by page, following the server's continuation cursor, and
//! downloads every asset it finds.

pub mod api;
pub mod config;
pub mod crawler;
pub mod download;
pub mod transport;

use thiserror::Error;

/// Main error type for MediaWiki-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed API response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Crawl cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrawlError {
    /// Returns true when the error was caused by a structurally broken response
    pub fn is_malformed(&self) -> bool {
        matches!(self, CrawlError::MalformedResponse { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing the base URI")]
    MissingBaseUri,

    #[error("Argument '{0}' cannot be blank")]
    BlankArgument(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for MediaWiki-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use api::{ImageRecord, MediaWikiApi, PageResponse, WikiPage};
pub use config::Config;
pub use crawler::{Backoff, ContinuationCrawler, CrawlState, CrawlStats};
pub use transport::{FetchResult, HttpTransport, Transport};
