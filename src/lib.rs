//! Link-Trawler: a polite, bounded-concurrency web crawler
//!
//! Starting from a seed URL, this crate discovers every reachable resource whose
//! host is within an allow-list, records the outcome of each one (fetched,
//! redirected, or errored) and returns once no further work remains.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Link-Trawler operations
///
/// Only setup can fail this way. Failures of individual URLs during a crawl are
/// recorded on their registry entries and never abort the run.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid allowed domain: {0}")]
    InvalidDomain(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Errors produced while fetching a single URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(reqwest::Error),

    #[error("{0} status code")]
    Status(u16),

    #[error("Error reading URL body ({0})")]
    BodyRead(reqwest::Error),

    #[error("{status} redirect without a Location header")]
    MissingLocation { status: u16 },
}

/// Errors produced while extracting links from a fetched body
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Error parsing HTML body ({reason})")]
    Markup { reason: String },
}

/// Result type alias for Link-Trawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Crawler;
pub use state::{DiscoveredLink, LinkStatus, Registry};
pub use crate::url::{extract_domain, normalize_url, resolve_url, DomainPolicy};
