//! reqwest-backed transport
//!
//! This module handles all HTTP requests made by the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for API pages and asset bytes
//! - Error classification for logging

use super::{FetchResult, Transport};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// Connections are never kept alive: the idle pool is disabled and every
/// request carries `Connection: close`, so exactly one connection is open
/// while a request is in flight.
///
/// # Example
///
/// ```no_run
/// use mediawiki_crawl::config::ClientConfig;
/// use mediawiki_crawl::transport::build_http_client;
///
/// let client = build_http_client(&ClientConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("close"));

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .pool_max_idle_per_host(0)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production [`Transport`] over a reqwest [`Client`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport from client configuration
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Sends the GET and checks the status
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | `Ok(response)` |
    /// | Non-2xx | `Err("[status] reason")` |
    /// | Timeout | `Err("Request timeout")` |
    /// | Connect failure | `Err("Connection refused")` |
    /// | Anything else | `Err(error text)` |
    async fn send(&self, url: &Url) -> Result<Response, String> {
        match self.client.get(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    Ok(response)
                } else {
                    Err(format!(
                        "[{}] {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown")
                    ))
                }
            }
            Err(e) => {
                if e.is_timeout() {
                    Err("Request timeout".to_string())
                } else if e.is_connect() {
                    Err("Connection refused".to_string())
                } else {
                    Err(e.to_string())
                }
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &Url) -> FetchResult<String> {
        let response = match self.send(url).await {
            Ok(response) => response,
            Err(reason) => {
                tracing::debug!("GET {} failed: {}", url, reason);
                return FetchResult::NoData { reason };
            }
        };

        match response.text().await {
            Ok(body) => FetchResult::Body(body),
            Err(e) => {
                tracing::debug!("Reading body of {} failed: {}", url, e);
                FetchResult::no_data(e.to_string())
            }
        }
    }

    async fn get_bytes(&self, url: &Url) -> FetchResult<Vec<u8>> {
        let response = match self.send(url).await {
            Ok(response) => response,
            Err(reason) => {
                tracing::debug!("GET {} failed: {}", url, reason);
                return FetchResult::NoData { reason };
            }
        };

        match response.bytes().await {
            Ok(bytes) => FetchResult::Body(bytes.to_vec()),
            Err(e) => {
                tracing::debug!("Reading body of {} failed: {}", url, e);
                FetchResult::no_data(e.to_string())
            }
        }
    }
}
