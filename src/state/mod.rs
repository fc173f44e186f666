//! State module for tracking crawl progress
//!
//! This module provides the shared state that every traversal task works
//! against during a crawl.
//!
//! # Components
//!
//! - `LinkStatus` / `DiscoveredLink`: The outcome recorded for each admitted URL
//! - `Registry`: The visited table, with atomic check-and-insert admission
//! - `WorkTracker`: Counts scheduled-but-unfinished traversal tasks

mod link_state;
mod registry;
mod work;

// Re-export main types
pub use link_state::{DiscoveredLink, LinkStatus};
pub use registry::Registry;
pub use work::{WorkGuard, WorkTracker};
