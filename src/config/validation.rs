use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    match &config.seed_url {
        Some(seed) => validate_seed_url(seed)?,
        None => {
            return Err(ConfigError::Validation(
                "a seed URL is required".to_string(),
            ))
        }
    }

    if config.depth < 1 {
        return Err(ConfigError::Validation(format!(
            "depth must be >= 1, got {}",
            config.depth
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if Duration::try_from_secs_f64(config.sleep).is_err() {
        return Err(ConfigError::Validation(format!(
            "sleep must be a non-negative number of seconds, got {}",
            config.sleep
        )));
    }

    if config.request_timeout == Some(0) {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1 second when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that the seed is an absolute URL with both a scheme and a host
fn validate_seed_url(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid seed URL '{}': {}. Use the form <scheme>://<location>/<path>, e.g. https://en.wikipedia.org/",
            seed, e
        ))
    })?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host. Use the form <scheme>://<location>/<path>",
            seed
        )));
    }

    Ok(())
}
