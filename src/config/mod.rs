//! Configuration module for Link-Trawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; command-line flags and environment variables are
//! layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use link_trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! println!("Crawler will use max concurrency: {}", config.crawler.max_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
