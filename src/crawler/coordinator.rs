//! Crawler coordinator - main crawl orchestration logic
//!
//! Every admitted URL gets its own task running the same algorithm:
//!
//! 1. Admission: normalize, check the domain policy, then atomically insert a
//!    pending registry entry. A URL already in the registry stops here.
//! 2. Acquire a concurrency slot (released on every exit path).
//! 3. Fetch; a failure is recorded on the entry and ends the task.
//! 4. Redirect: record the resolved target and schedule it if its host is
//!    allowed. Body: record the content type, extract links, admit allowed
//!    leaf resources directly and collect the traversal candidates.
//! 5. Spawn one new task per candidate.
//!
//! Each spawned task holds a [`WorkGuard`]; [`Crawler::crawl`] returns once all
//! of them have been dropped.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::extractor::{extract_links, ExtractedLinks};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::output::CrawlStatistics;
use crate::state::{Registry, WorkGuard, WorkTracker};
use crate::url::{normalize_url, resolve_url, DomainPolicy};
use crate::{ConfigError, CrawlError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use url::Url;

/// Polite, bounded-concurrency crawler
///
/// # Example
///
/// ```no_run
/// use link_trawler::config::CrawlerConfig;
/// use link_trawler::url::DomainPolicy;
/// use link_trawler::Crawler;
///
/// # async fn example() -> Result<(), link_trawler::CrawlError> {
/// let crawler = Crawler::new(
///     &CrawlerConfig::with_max_concurrency(5),
///     DomainPolicy::new(["example.com"]),
/// )?;
///
/// crawler.crawl("https://example.com/").await;
/// println!("Found {} unique links", crawler.registry().len());
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    shared: Arc<Shared>,
}

/// State shared by every traversal task of a crawler
struct Shared {
    fetcher: Fetcher,
    policy: DomainPolicy,
    registry: Registry,
    slots: Semaphore,
    work: Arc<WorkTracker>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Crawler {
    /// Creates a crawler with the given settings and allow-list
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(CrawlError)` - Invalid concurrency ceiling or HTTP client failure
    pub fn new(config: &CrawlerConfig, policy: DomainPolicy) -> Result<Self, CrawlError> {
        if config.max_concurrency == 0 {
            return Err(ConfigError::Validation(
                "max_concurrency must be at least 1".to_string(),
            )
            .into());
        }

        let fetcher = Fetcher::new(config)?;

        Ok(Self {
            shared: Arc::new(Shared {
                fetcher,
                policy,
                registry: Registry::new(),
                slots: Semaphore::new(config.max_concurrency),
                work: WorkTracker::new(),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }),
        })
    }

    /// Creates a crawler from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        Self::new(
            &config.crawler,
            DomainPolicy::new(&config.allowed_domains),
        )
    }

    /// Crawls everything reachable from `seed_url` and waits until done
    ///
    /// An unparseable seed, or one whose host the policy rejects, is never
    /// admitted. Results accumulate in [`Crawler::registry`].
    pub async fn crawl(&self, seed_url: &str) {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl from {} (allowed domains: {:?})",
            seed_url,
            self.shared.policy.domains()
        );

        schedule(&self.shared, seed_url.to_string());
        self.shared.work.wait_drained().await;

        tracing::info!(
            "Crawl completed: {} unique links in {:?}",
            self.shared.registry.len(),
            start_time.elapsed()
        );
    }

    /// The table of every URL admitted so far
    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    /// The allow-list every discovered host is checked against
    pub fn policy(&self) -> &DomainPolicy {
        &self.shared.policy
    }

    /// Counts of registry entries by status
    pub fn statistics(&self) -> CrawlStatistics {
        CrawlStatistics::from_links(&self.shared.registry.snapshot())
    }

    /// Highest number of tasks that were fetching or extracting at once
    pub fn peak_concurrency(&self) -> usize {
        self.shared.peak_in_flight.load(Ordering::SeqCst)
    }
}

/// Spawns a traversal task for `link`, counted as outstanding work
fn schedule(shared: &Arc<Shared>, link: String) {
    let guard = shared.work.start();
    tokio::spawn(Arc::clone(shared).visit(link, guard));
}

impl Shared {
    /// Runs the per-URL algorithm; `_guard` is released when this returns
    async fn visit(self: Arc<Self>, link: String, _guard: WorkGuard) {
        let Some(url) = self.admit(&link) else {
            return;
        };

        let candidates = {
            let Ok(_permit) = self.slots.acquire().await else {
                self.registry
                    .record_error(url.as_str(), "Concurrency pool closed".to_string());
                return;
            };
            let _in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);

            self.process(&url).await
        };

        for candidate in candidates {
            schedule(&self, candidate);
        }
    }

    /// Atomically admits `link` into the registry
    ///
    /// Returns the normalized URL when this call admitted it.
    fn admit(&self, link: &str) -> Option<Url> {
        let url = match normalize_url(link) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", link, e);
                return None;
            }
        };

        if !self.policy.allows_url(&url) {
            tracing::debug!("Skipping {}: domain not allowed", url);
            return None;
        }

        if !self.registry.admit(url.as_str()) {
            tracing::trace!("Already discovered {}", url);
            return None;
        }

        tracing::debug!("Admitted {}", url);
        Some(url)
    }

    /// Fetches one admitted URL, records the outcome and returns the links to
    /// traverse next
    async fn process(&self, url: &Url) -> Vec<String> {
        let url_str = url.as_str();

        let fetched = match self.fetcher.fetch(url_str).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url_str, e);
                self.registry.record_error(url_str, e.to_string());
                return Vec::new();
            }
        };

        match fetched {
            FetchResult::Redirect {
                location,
                content_type,
            } => self.handle_redirect(url, &location, content_type),

            FetchResult::Body { content_type, body } => {
                self.registry.record_fetched(url_str, content_type.clone());

                match extract_links(url, &body, &content_type) {
                    Ok(links) => self.handle_discovered_links(links),
                    Err(e) => {
                        tracing::warn!("Failed to extract links from {}: {}", url_str, e);
                        Vec::new()
                    }
                }
            }
        }
    }

    fn handle_redirect(&self, url: &Url, location: &str, content_type: String) -> Vec<String> {
        let url_str = url.as_str();
        let content_type = Some(content_type).filter(|ct| !ct.is_empty());

        let Some(target) = resolve_url(location, url) else {
            tracing::warn!("Unresolvable redirect from {} to {:?}", url_str, location);
            self.registry
                .record_error(url_str, format!("Invalid redirect location ({})", location));
            return Vec::new();
        };

        tracing::debug!("{} redirects to {}", url_str, target);
        self.registry
            .record_redirect(url_str, target.to_string(), content_type);

        if self.policy.allows_url(&target) {
            vec![target.to_string()]
        } else {
            tracing::debug!("Not following redirect to {}: domain not allowed", target);
            Vec::new()
        }
    }

    /// Splits extracted links into traversal candidates and leaf resources
    ///
    /// Allowed leaves are admitted straight away and never scheduled. The map
    /// keys are unique, so the returned candidates carry no duplicates.
    fn handle_discovered_links(&self, links: ExtractedLinks) -> Vec<String> {
        let mut candidates = Vec::new();

        for (link, traverse) in links {
            if traverse {
                if !self.registry.contains(&link) {
                    candidates.push(link);
                }
                continue;
            }

            match Url::parse(&link) {
                Ok(leaf) if self.policy.allows_url(&leaf) => {
                    if self.registry.admit_leaf(&link) {
                        tracing::debug!("Recorded leaf resource {}", link);
                    }
                }
                _ => tracing::trace!("Ignoring leaf resource {}", link),
            }
        }

        candidates
    }
}

/// Marks one task as inside the fetch+extract section while alive
struct InFlight<'a> {
    current: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(current: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self { current }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}
