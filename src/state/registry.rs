use crate::state::link_state::{DiscoveredLink, LinkStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared table of every URL ever admitted into a crawl
///
/// Cloning a `Registry` yields another handle to the same table. Admission is a
/// single check-and-insert under one lock, so each normalized URL is admitted by
/// exactly one task no matter how many discover it concurrently.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    links: Arc<Mutex<HashMap<String, DiscoveredLink>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits `url` as a pending traversal
    ///
    /// Returns true if this call inserted the entry, false if the URL was
    /// already present (in which case nothing changes).
    pub fn admit(&self, url: &str) -> bool {
        self.insert_if_absent(DiscoveredLink::pending(url))
    }

    /// Admits `url` as a leaf resource that will never be fetched
    ///
    /// Returns false, leaving the existing entry untouched, if the URL is
    /// already known.
    pub fn admit_leaf(&self, url: &str) -> bool {
        self.insert_if_absent(DiscoveredLink::leaf(url))
    }

    /// Records a fetched body for an admitted URL
    pub fn record_fetched(&self, url: &str, content_type: String) {
        self.update(url, LinkStatus::Fetched, Some(content_type));
    }

    /// Records a redirect to an already-resolved target
    pub fn record_redirect(&self, url: &str, target: String, content_type: Option<String>) {
        self.update(url, LinkStatus::Redirected { target }, content_type);
    }

    /// Records a terminal error
    pub fn record_error(&self, url: &str, message: String) {
        self.update(url, LinkStatus::Errored { message }, None);
    }

    /// Returns a copy of the entry for `url`, if admitted
    pub fn get(&self, url: &str) -> Option<DiscoveredLink> {
        self.lock().get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    /// Number of unique URLs discovered so far
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies every entry out of the table, sorted lexicographically by URL
    pub fn snapshot(&self) -> Vec<DiscoveredLink> {
        let mut links: Vec<DiscoveredLink> = self.lock().values().cloned().collect();
        links.sort_by(|a, b| a.url.cmp(&b.url));
        links
    }

    fn insert_if_absent(&self, link: DiscoveredLink) -> bool {
        let mut links = self.lock();
        if links.contains_key(&link.url) {
            return false;
        }
        links.insert(link.url.clone(), link);
        true
    }

    fn update(&self, url: &str, status: LinkStatus, content_type: Option<String>) {
        let mut links = self.lock();
        match links.get_mut(url) {
            Some(link) => {
                link.status = status;
                if content_type.is_some() {
                    link.content_type = content_type;
                }
            }
            None => tracing::warn!("Attempted to record {} for unknown URL {}", status, url),
        }
    }

    // Every critical section leaves the map consistent, so a poisoned lock is
    // still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, DiscoveredLink>> {
        self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
