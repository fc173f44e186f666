//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with manual redirect handling
//! - Content-type aware link extraction
//! - Overall crawl coordination under a concurrency ceiling

mod coordinator;
mod extractor;
mod fetcher;

pub use coordinator::Crawler;
pub use extractor::{
    extract_links, extract_markup_links, extract_meta_refresh, extract_text_links,
    ExtractedLinks, Strategy,
};
pub use fetcher::{build_http_client, is_redirect, FetchResult, Fetcher};
