//! Request URL construction
//!
//! Every value placed into a query string goes through
//! `application/x-www-form-urlencoded` encoding, so titles and cursors
//! containing `&`, `=`, `#` or spaces cannot alter the request.

use crate::config::validate_base_uri;
use crate::ConfigError;
use url::Url;

const API_SCRIPT: &str = "/api.php";

/// The `api.php` endpoint of one wiki
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    api_url: Url,
}

impl Endpoint {
    /// Validates and normalizes a base URI
    ///
    /// If the path does not already mention `/api.php` (case-insensitively),
    /// trailing slashes are trimmed and `/api.php` is appended.
    ///
    /// # Example
    ///
    /// ```
    /// use mediawiki_crawl::api::Endpoint;
    ///
    /// let endpoint = Endpoint::new("https://wiki.example.com/w/").unwrap();
    /// assert_eq!(endpoint.api_url().as_str(), "https://wiki.example.com/w/api.php");
    /// ```
    pub fn new(base_uri: &str) -> Result<Self, ConfigError> {
        let mut api_url = validate_base_uri(Some(base_uri))?;

        if !api_url.path().to_lowercase().contains(API_SCRIPT) {
            let path = format!("{}{}", api_url.path().trim_end_matches('/'), API_SCRIPT);
            api_url.set_path(&path);
        }

        Ok(Self { api_url })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// `?format=xml&action=query&list=allimages&aifrom=<cursor>`
    pub fn all_images_url(&self, cursor: &str) -> Url {
        self.query_url(&[("list", "allimages"), ("aifrom", cursor)])
    }

    /// `?format=xml&action=query&titles=<title>&prop=imageinfo&iiprop=url`
    pub fn image_info_url(&self, title: &str) -> Url {
        self.query_url(&[("titles", title), ("prop", "imageinfo"), ("iiprop", "url")])
    }

    /// `?format=xml&action=query&titles=<title>&prop=images`
    pub fn page_images_url(&self, title: &str) -> Url {
        self.query_url(&[("titles", title), ("prop", "images")])
    }

    fn query_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.api_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "xml");
            pairs.append_pair("action", "query");
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}
