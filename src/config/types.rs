use serde::Deserialize;

/// User agent sent by default (a desktop Chrome string some wikis expect)
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.1 (KHTML, like Gecko) Chrome/22.0.1207.1 Safari/537.1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Cursor the listing starts from when none is given
pub const DEFAULT_START_CURSOR: &str = "0";

/// Initial seed of the backoff generator
pub const DEFAULT_BACKOFF_SEED: u32 = 42;

/// Length of one backoff step (milliseconds)
pub const DEFAULT_DELAY_UNIT_MS: u64 = 1000;

/// Main configuration structure for MediaWiki-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Listing crawl configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Value of `aifrom` for the first page
    #[serde(rename = "start-cursor")]
    pub start_cursor: String,

    /// Seed the backoff delays are derived from
    #[serde(rename = "backoff-seed")]
    pub backoff_seed: u32,

    /// Duration of one backoff step (milliseconds)
    #[serde(rename = "delay-unit-ms")]
    pub delay_unit_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_cursor: DEFAULT_START_CURSOR.to_string(),
            backoff_seed: DEFAULT_BACKOFF_SEED,
            delay_unit_ms: DEFAULT_DELAY_UNIT_MS,
        }
    }
}

/// Download output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory downloaded assets are written to
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}
