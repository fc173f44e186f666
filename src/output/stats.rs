//! Statistics over a crawl's registry
//!
//! This module summarises registry entries by status so a run can be
//! described in one log line or a short table.

use crate::state::{DiscoveredLink, LinkStatus};
use std::collections::HashSet;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of unique URLs discovered
    pub total_links: usize,

    /// URLs whose traversal had not finished
    pub pending: usize,

    /// Leaf resources recorded but never fetched
    pub leaves: usize,

    /// URLs fetched successfully
    pub fetched: usize,

    /// URLs that answered with a redirect
    pub redirected: usize,

    /// URLs whose fetch failed
    pub errored: usize,

    /// Number of distinct hosts among the discovered URLs
    pub unique_domains: usize,
}

impl CrawlStatistics {
    /// Builds statistics from registry entries
    pub fn from_links(links: &[DiscoveredLink]) -> Self {
        let mut stats = Self {
            total_links: links.len(),
            ..Self::default()
        };
        let mut domains = HashSet::new();

        for link in links {
            match link.status {
                LinkStatus::Pending => stats.pending += 1,
                LinkStatus::Leaf => stats.leaves += 1,
                LinkStatus::Fetched => stats.fetched += 1,
                LinkStatus::Redirected { .. } => stats.redirected += 1,
                LinkStatus::Errored { .. } => stats.errored += 1,
            }

            if let Some(domain) = url::Url::parse(&link.url)
                .ok()
                .as_ref()
                .and_then(crate::url::extract_domain)
            {
                domains.insert(domain);
            }
        }

        stats.unique_domains = domains.len();
        stats
    }

    /// Share of visited (non-leaf) URLs that were fetched, as a percentage
    pub fn success_rate(&self) -> f64 {
        let visited = self.total_links - self.leaves;
        if visited == 0 {
            return 0.0;
        }
        (self.fetched as f64 / visited as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Unique links discovered: {}", stats.total_links);
    println!("  Unique domains: {}", stats.unique_domains);
    println!();

    println!("Links by Status:");
    for (label, count) in [
        ("fetched", stats.fetched),
        ("redirected", stats.redirected),
        ("errored", stats.errored),
        ("leaf", stats.leaves),
        ("pending", stats.pending),
    ] {
        if count > 0 {
            println!("  {}: {}", label, count);
        }
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} visited links fetched)",
        stats.success_rate(),
        stats.fetched,
        stats.total_links - stats.leaves
    );
}
