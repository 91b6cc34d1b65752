//! Shared helpers for the integration tests

use mediawiki_crawl::config::ClientConfig;
use mediawiki_crawl::crawler::Backoff;
use mediawiki_crawl::transport::HttpTransport;
use mediawiki_crawl::MediaWikiApi;
use std::sync::Arc;
use std::time::Duration;

/// Builds an API handle against a mock server with millisecond backoff steps
pub fn create_test_api(base_uri: &str, timeout_secs: u64) -> MediaWikiApi {
    let config = ClientConfig {
        user_agent: "TestBot/1.0".to_string(),
        timeout_secs,
    };
    let transport = HttpTransport::new(&config).expect("Failed to build transport");

    MediaWikiApi::new(base_uri, Arc::new(transport))
        .expect("Failed to create API")
        .with_backoff(Backoff::new(42, Duration::from_millis(1)))
}

/// Renders one listing page
///
/// Each entry is `(name, asset_url)`; `cursor` becomes the `aifrom` of a
/// `<query-continue>` section when set.
pub fn listing_xml(images: &[(&str, &str)], cursor: Option<&str>) -> String {
    let continuation = cursor
        .map(|c| {
            format!(
                r#"<query-continue><allimages aifrom="{}" /></query-continue>"#,
                c
            )
        })
        .unwrap_or_default();

    let imgs: String = images
        .iter()
        .map(|(name, url)| {
            format!(
                r#"<img name="{}" url="{}" descriptionurl="https://wiki.example.com/File:{}" />"#,
                name, url, name
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0"?><api>{}<query><allimages>{}</allimages></query></api>"#,
        continuation, imgs
    )
}
