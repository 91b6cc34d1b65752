//! Transport layer for talking to the wiki
//!
//! The crawler and the downloader only ever see the [`Transport`] trait. A
//! failed request never raises: it comes back as [`FetchResult::NoData`],
//! which callers treat as "nothing here".

mod http;

pub use http::{build_http_client, HttpTransport};

use async_trait::async_trait;
use url::Url;

/// Result of a single GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult<T> {
    /// The server answered with a 2xx status and this body
    Body(T),

    /// The request failed (timeout, DNS, connect, non-2xx, body read)
    NoData {
        /// Short description of what went wrong
        reason: String,
    },
}

impl<T> FetchResult<T> {
    /// Creates a `NoData` result from anything printable
    pub fn no_data(reason: impl Into<String>) -> Self {
        FetchResult::NoData {
            reason: reason.into(),
        }
    }
}

/// A blocking-per-call HTTP GET primitive
///
/// Implementations must not return errors; every failure is folded into
/// [`FetchResult::NoData`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the body decoded as text
    async fn get_text(&self, url: &Url) -> FetchResult<String>;

    /// Fetches `url` and returns the raw body
    async fn get_bytes(&self, url: &Url) -> FetchResult<Vec<u8>>;
}
