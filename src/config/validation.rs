use crate::config::types::{ClientConfig, Config, CrawlConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_client_config(&config.client)?;
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    // The start cursor may legitimately be empty: it is sent as `aifrom=`.
    // Any seed is acceptable; the generator maps every value.
    if config.delay_unit_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "delay_unit_ms must be <= 60000ms, got {}ms",
            config.delay_unit_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the base URI given on the command line
///
/// A missing or blank URI is rejected before any network activity. The value
/// must parse as an absolute `http` or `https` URL.
pub fn validate_base_uri(base_uri: Option<&str>) -> Result<Url, ConfigError> {
    let raw = match base_uri {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return Err(ConfigError::MissingBaseUri),
    };

    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl(format!(
            "unsupported scheme '{}' in {}",
            other, raw
        ))),
    }
}
