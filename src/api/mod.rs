//! MediaWiki query API client
//!
//! [`MediaWikiApi`] binds a wiki's `api.php` endpoint to a [`Transport`] and
//! exposes the listing crawl plus the single-item lookups.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mediawiki_crawl::api::MediaWikiApi;
//! use mediawiki_crawl::config::ClientConfig;
//! use mediawiki_crawl::transport::HttpTransport;
//!
//! # async fn run() -> Result<(), mediawiki_crawl::CrawlError> {
//! let transport = HttpTransport::new(&ClientConfig::default())?;
//! let api = MediaWikiApi::new("https://wiki.example.com", Arc::new(transport))?;
//!
//! let mut crawler = api.all_images("0");
//! while let Some(image) = crawler.next_record().await? {
//!     println!("{} -> {}", image.name, image.asset_url);
//! }
//! # Ok(())
//! # }
//! ```

mod endpoint;
mod parser;
mod types;

pub use endpoint::Endpoint;
pub use parser::{parse_image_info, parse_listing, parse_page_images};
pub use types::{ImageRecord, PageResponse, WikiPage};

use crate::crawler::{Backoff, ContinuationCrawler};
use crate::transport::{FetchResult, Transport};
use crate::{ConfigError, CrawlError};
use std::sync::Arc;
use url::Url;

/// Handle on one wiki's query API
#[derive(Clone)]
pub struct MediaWikiApi {
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
    backoff: Backoff,
}

impl MediaWikiApi {
    /// Creates a handle for the wiki at `base_uri`
    ///
    /// `/api.php` is appended when the URI does not already name it.
    pub fn new(base_uri: &str, transport: Arc<dyn Transport>) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: Endpoint::new(base_uri)?,
            transport,
            backoff: Backoff::default(),
        })
    }

    /// Replaces the pacing used between listing pages
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Starts a fresh crawl of every image, beginning at `start_cursor`
    ///
    /// Each call returns an independent crawler with its own cursor and seed.
    pub fn all_images(&self, start_cursor: &str) -> ContinuationCrawler {
        ContinuationCrawler::new(
            Arc::clone(&self.transport),
            self.endpoint.clone(),
            self.backoff,
            start_cursor,
        )
    }

    /// Fetches a page title together with the titles of the images it uses
    pub async fn page(&self, title: &str) -> Result<WikiPage, CrawlError> {
        let image_titles = self.page_images(title).await?;

        Ok(WikiPage {
            title: title.to_string(),
            image_titles,
        })
    }

    /// Looks up a single file page (e.g. `File:Example.jpg`)
    ///
    /// # Returns
    ///
    /// * `Ok(Some(record))` - The file exists
    /// * `Ok(None)` - No image info, or the request failed
    /// * `Err(CrawlError::MalformedResponse)` - Unparseable reply
    pub async fn page_image(&self, title: &str) -> Result<Option<ImageRecord>, CrawlError> {
        let title = require_title(title)?;
        let url = self.endpoint.image_info_url(title);

        match self.fetch_text(&url).await {
            Some(body) => parse_image_info(&body, title, self.endpoint.api_url())
                .map_err(|message| malformed(&url, message)),
            None => Ok(None),
        }
    }

    /// Lists the titles of images used on a page
    pub async fn page_images(&self, title: &str) -> Result<Vec<String>, CrawlError> {
        let title = require_title(title)?;
        let url = self.endpoint.page_images_url(title);

        match self.fetch_text(&url).await {
            Some(body) => parse_page_images(&body).map_err(|message| malformed(&url, message)),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_text(&self, url: &Url) -> Option<String> {
        match self.transport.get_text(url).await {
            FetchResult::Body(body) if !body.trim().is_empty() => Some(body),
            FetchResult::Body(_) => None,
            FetchResult::NoData { reason } => {
                tracing::debug!("No data from {}: {}", url, reason);
                None
            }
        }
    }
}

fn require_title(title: &str) -> Result<&str, ConfigError> {
    if title.trim().is_empty() {
        Err(ConfigError::BlankArgument("title"))
    } else {
        Ok(title)
    }
}

fn malformed(url: &Url, message: String) -> CrawlError {
    CrawlError::MalformedResponse {
        url: url.to_string(),
        message,
    }
}
