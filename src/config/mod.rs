//! Configuration module for Linktrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a built-in default, so a crawl can run without any file.
//!
//! # Example
//!
//! ```no_run
//! use linktrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linktrawl.toml")).unwrap();
//! println!("Crawler will use {} fetch workers", config.crawler.fetch_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, DEFAULT_LINK_LOG_PATH, DEFAULT_SEED_URL};

// Re-export parser functions
pub use parser::{
    compute_config_hash, default_config, load_config, load_config_with_hash, parse_config,
};
pub use validation::validate;
