use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for either worker pool
const MAX_WORKERS: u32 = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_seed_url(&config.seed_url)?;

    if config.fetch_workers < 1 || config.fetch_workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "fetch_workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.fetch_workers
        )));
    }

    if config.extraction_workers < 1 || config.extraction_workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "extraction_workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.extraction_workers
        )));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the seed URL: absolute, HTTP(S), with a host
fn validate_seed_url(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use HTTP or HTTPS, got {}",
            seed,
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.link_log_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "link_log_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
