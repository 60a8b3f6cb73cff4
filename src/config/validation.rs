use crate::config::types::{BrowserConfig, Config, DiscoveryConfig, FetchConfig, ReviewsConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site(&config.site.origin, &config.site.reviews_path_prefix)?;
    validate_browser(&config.browser)?;
    validate_fetch(&config.fetch)?;
    validate_discovery(&config.discovery)?;
    validate_reviews(&config.reviews)?;
    Ok(())
}

fn validate_site(origin: &str, prefix: &str) -> Result<(), ConfigError> {
    let url =
        Url::parse(origin).map_err(|e| ConfigError::InvalidUrl(format!("origin: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "origin must be http(s), got '{}'",
            origin
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "origin must have a host, got '{}'",
            origin
        )));
    }

    if !prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "reviews-path-prefix must start with '/', got '{}'",
            prefix
        )));
    }

    Ok(())
}

fn validate_browser(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "navigation-timeout-secs must be >= 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_fetch(config: &FetchConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("rate-limit-base-secs", config.rate_limit_base_secs),
        ("captcha-base-secs", config.captcha_base_secs),
        ("error-base-secs", config.error_base_secs),
        ("per-wait-ceiling-secs", config.per_wait_ceiling_secs),
        ("max-total-wait-secs", config.max_total_wait_secs),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    if config.per_wait_ceiling_secs > config.max_total_wait_secs {
        return Err(ConfigError::Validation(format!(
            "per-wait-ceiling-secs ({}) cannot exceed max-total-wait-secs ({})",
            config.per_wait_ceiling_secs, config.max_total_wait_secs
        )));
    }

    Ok(())
}

fn validate_discovery(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    validate_path("discovery.categories-path", &config.categories_path)?;
    validate_path("discovery.output-path", &config.output_path)?;
    validate_path("discovery.checkpoint-path", &config.checkpoint_path)?;
    validate_path("discovery.heartbeat-path", &config.heartbeat_path)?;

    if config.retry_base_secs < 1 {
        return Err(ConfigError::Validation(
            "discovery.retry-base-secs must be >= 1".to_string(),
        ));
    }

    if config.retry_max_secs < config.retry_base_secs {
        return Err(ConfigError::Validation(format!(
            "discovery.retry-max-secs ({}) must be >= retry-base-secs ({})",
            config.retry_max_secs, config.retry_base_secs
        )));
    }

    Ok(())
}

fn validate_reviews(config: &ReviewsConfig) -> Result<(), ConfigError> {
    validate_path("reviews.products-path", &config.products_path)?;
    validate_path("reviews.output-path", &config.output_path)?;
    validate_path("reviews.checkpoint-path", &config.checkpoint_path)?;
    validate_path("reviews.heartbeat-path", &config.heartbeat_path)?;

    if config.max_age_years < 1 {
        return Err(ConfigError::Validation(
            "reviews.max-age-years must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_path(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_site() {
        assert!(validate_site("https://www.capterra.ch", "/reviews/").is_ok());
        assert!(validate_site("http://localhost:8080", "/reviews/").is_ok());

        assert!(validate_site("", "/reviews/").is_err());
        assert!(validate_site("ftp://example.com", "/reviews/").is_err());
        assert!(validate_site("https://example.com", "reviews/").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("x", "progress.txt").is_ok());
        assert!(validate_path("x", "").is_err());
    }
}
