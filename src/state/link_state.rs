/// Link state definitions for tracking crawl progress
///
/// This module defines the outcome recorded for every URL admitted into a crawl.
use std::fmt;

/// Represents the current state of a discovered URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    // ===== Active States =====
    /// URL has been admitted and its traversal task has not finished yet
    Pending,

    // ===== Terminal States =====
    /// URL was recorded as a leaf resource (image, form target) and never fetched
    Leaf,

    /// URL was fetched and its body handed to the link extractor
    Fetched,

    /// URL answered with a redirect to `target` (already resolved)
    Redirected { target: String },

    /// URL could not be fetched
    Errored { message: String },
}

impl LinkStatus {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Errored { .. })
    }

    /// Short lowercase label, used in logs and statistics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Leaf => "leaf",
            Self::Fetched => "fetched",
            Self::Redirected { .. } => "redirected",
            Self::Errored { .. } => "errored",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One entry per normalized URL ever admitted into a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Normalized absolute URL (the registry key)
    pub url: String,

    /// Outcome of the traversal
    pub status: LinkStatus,

    /// Content-Type header of the response, when one was received
    pub content_type: Option<String>,
}

impl DiscoveredLink {
    /// Creates a freshly admitted entry
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: LinkStatus::Pending,
            content_type: None,
        }
    }

    /// Creates an entry for a leaf resource that will never be fetched
    pub fn leaf(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: LinkStatus::Leaf,
            content_type: None,
        }
    }

    /// The resolved redirect target, if this URL redirected
    pub fn redirect_target(&self) -> Option<&str> {
        match &self.status {
            LinkStatus::Redirected { target } => Some(target),
            _ => None,
        }
    }

    /// The recorded error message, if this URL errored
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            LinkStatus::Errored { message } => Some(message),
            _ => None,
        }
    }
}
