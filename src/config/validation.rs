use crate::config::types::{Config, CrawlerConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the concurrency ceiling
const MAX_CONCURRENCY: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_allowed_domains(&config.allowed_domains)?;

    if let Some(start_url) = &config.start_url {
        validate_start_url(start_url)?;
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrency
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates allow-list entries
fn validate_allowed_domains(domains: &[String]) -> Result<(), ConfigError> {
    for domain in domains {
        validate_domain(domain)?;
    }
    Ok(())
}

/// Validates a single allow-list entry: a bare host, no scheme, path or wildcard
fn validate_domain(domain: &str) -> Result<(), ConfigError> {
    let domain = domain.trim();

    if domain.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "Domain cannot be empty".to_string(),
        ));
    }

    if domain.contains("://") {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' must be a bare host, not a URL",
            domain
        )));
    }

    if domain.contains('*') {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot contain wildcards; subdomains are always included",
            domain
        )));
    }

    // IPv6 literals keep their brackets, as in the URL host
    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}

/// Validates the seed URL
fn validate_start_url(start_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use an http or https scheme",
            start_url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            start_url
        )));
    }

    Ok(())
}
