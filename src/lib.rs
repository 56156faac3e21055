//! Linktrawl: a single-host concurrent link crawler
//!
//! This crate crawls one origin starting from a seed URL, records every hyperlink it
//! observes to an append-only link log, and follows same-origin links until no new
//! work is produced.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
///
/// Only conditions that end a run surface here. Per-link and per-page failures are
/// handled where they occur and reported through `tracing`.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed URL {url} is unreachable: {source}")]
    SeedUnreachable { url: String, source: FetchError },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Malformed URL {href}: {source}")]
    Malformed {
        href: String,
        source: ::url::ParseError,
    },

    #[error("URL {0} cannot serve as a crawl origin")]
    NoOrigin(String),
}

/// Reasons a single page fetch is abandoned
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Unparseable HTML at {url}: {message}")]
    Parse { url: String, message: String },
}

impl FetchError {
    /// Short label used in diagnostics and statistics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Http { .. } => "http",
            Self::Parse { .. } => "parse",
        }
    }
}

/// A link record could not be appended to the link log
#[derive(Debug, Error)]
#[error("Failed to write link log {path}: {source}")]
pub struct LogWriteError {
    pub path: String,
    pub source: std::io::Error,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use output::{CrawlSummary, LinkLog};
pub use state::CrawlPhase;
pub use crate::url::{classify, normalize, LinkScope, NormalizedUrl};
