use crate::config::types::Config;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
///
/// # Example
///
/// ```
/// use link_trawler::config::parse_config;
///
/// let config = parse_config(r#"
/// allowed-domains = ["example.com"]
///
/// [crawler]
/// max-concurrency = 8
/// "#).unwrap();
///
/// assert_eq!(config.crawler.max_concurrency, 8);
/// assert_eq!(config.crawler.request_timeout_secs, 10);
/// ```
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;

    validate(&config)?;

    Ok(config)
}
