//! Crawler module for the paginated image listing
//!
//! This module contains the core crawling logic:
//! - Walking the `allimages` continuation protocol page by page
//! - Pacing follow-up requests with a deterministic jittered delay
//! - Cancellation between pages

mod backoff;
mod continuation;

pub use backoff::{Backoff, SubtractiveRng};
pub use continuation::{ContinuationCrawler, CrawlState, CrawlStats};

use crate::api::MediaWikiApi;
use crate::config::Config;
use crate::transport::HttpTransport;
use crate::CrawlError;
use std::sync::Arc;
use std::time::Duration;

/// Builds the API handle a crawl runs against
///
/// Validates the base URI and builds the HTTP transport; no request is made.
///
/// # Returns
///
/// * `Ok(MediaWikiApi)` - Ready to crawl
/// * `Err(CrawlError::Config)` - The base URI is missing or invalid
/// * `Err(CrawlError::Http)` - The HTTP client could not be built
pub fn build_api(base_uri: &str, config: &Config) -> Result<MediaWikiApi, CrawlError> {
    let transport = HttpTransport::new(&config.client)?;
    let backoff = Backoff::new(
        config.crawl.backoff_seed,
        Duration::from_millis(config.crawl.delay_unit_ms),
    );

    Ok(MediaWikiApi::new(base_uri, Arc::new(transport))?.with_backoff(backoff))
}
