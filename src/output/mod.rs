//! Output module for crawl reports
//!
//! This module handles:
//! - Writing the sorted link report, optionally with per-entry details
//! - Summarising registry entries by status

mod report;
pub mod stats;

pub use report::{print_report, write_report};
pub use stats::{print_statistics, CrawlStatistics};
