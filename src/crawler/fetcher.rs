//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests to fetch page content
//! - Manual redirect handling (the client never follows redirects itself)
//! - Error classification

use crate::config::CrawlerConfig;
use crate::FetchError;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;

/// Successful outcome of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// 2xx response with its body
    Body {
        /// Content-Type header value (empty when absent)
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Redirect response; `location` is the raw header value, not yet resolved
    Redirect {
        location: String,
        /// Content-Type header value (empty when absent)
        content_type: String,
    },
}

/// Issues single GET requests without following redirects
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher from crawler settings
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Fetches one URL
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | 2xx | `Body` |
    /// | 301, 302, 303, 307, 308 with `Location` | `Redirect` |
    /// | redirect status without `Location` | `FetchError::MissingLocation` |
    /// | any other status | `FetchError::Status` |
    /// | DNS, connect, TLS, timeout | `FetchError::Transport` |
    /// | body stream interrupted | `FetchError::BodyRead` |
    ///
    /// The response body is consumed on every path so the connection goes back
    /// to the pool.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        let content_type = header_value(&response, CONTENT_TYPE.as_str());

        if is_redirect(status) {
            let location = header_value(&response, LOCATION.as_str());
            drain(response).await;

            if location.trim().is_empty() {
                return Err(FetchError::MissingLocation {
                    status: status.as_u16(),
                });
            }

            return Ok(FetchResult::Redirect {
                location,
                content_type,
            });
        }

        if !status.is_success() {
            drain(response).await;
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(FetchError::BodyRead)?;

        Ok(FetchResult::Body { content_type, body })
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are disabled so that each hop is recorded as its own entry.
///
/// # Example
///
/// ```no_run
/// use link_trawler::config::CrawlerConfig;
/// use link_trawler::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// Statuses treated as redirects
pub fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn header_value(response: &Response, name: &str) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Reads and discards whatever body is left
async fn drain(response: Response) {
    if let Err(e) = response.bytes().await {
        tracing::trace!("Discarding unreadable body: {}", e);
    }
}
