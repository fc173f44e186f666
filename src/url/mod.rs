//! URL handling module for Link-Trawler
//!
//! This module provides reference resolution, seed normalization, host
//! extraction and the allow-list domain policy.

mod domain;
mod resolve;

// Re-export main functions
pub use domain::{extract_domain, DomainPolicy};
pub use resolve::{normalize_url, resolve_url};
