use serde::Deserialize;

/// User agent sent with every request unless configured otherwise
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Main configuration structure for Link-Trawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// URL the crawl starts from
    #[serde(default, rename = "start-url")]
    pub start_url: Option<String>,

    /// Host suffixes the crawl may visit (subdomains included)
    #[serde(default, rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of URLs fetched and extracted at the same time
    #[serde(default = "default_max_concurrency", rename = "max-concurrency")]
    pub max_concurrency: usize,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout", rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header value
    #[serde(default = "default_user_agent", rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl CrawlerConfig {
    /// Default settings with a different concurrency ceiling
    pub fn with_max_concurrency(max_concurrency: usize) -> Self {
        Self {
            max_concurrency,
            ..Self::default()
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Print redirect targets and error messages under each URL
    #[serde(default, rename = "include-details")]
    pub include_details: bool,
}

fn default_max_concurrency() -> usize {
    5
}

fn default_request_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
