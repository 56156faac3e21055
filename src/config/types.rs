use serde::Deserialize;

/// Seed origin crawled when no configuration file overrides it
pub const DEFAULT_SEED_URL: &str = "https://scrape-me.dreamsofcode.io";

/// Link log written when no configuration file overrides it
pub const DEFAULT_LINK_LOG_PATH: &str = "links.txt";

/// Main configuration structure for Linktrawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; its origin bounds which links are followed
    #[serde(rename = "seed-url", default = "default_seed_url")]
    pub seed_url: String,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "fetch-workers", default = "default_fetch_workers")]
    pub fetch_workers: u32,

    /// Maximum number of concurrent document extractions
    #[serde(rename = "extraction-workers", default = "default_extraction_workers")]
    pub extraction_workers: u32,

    /// Per-request deadline in seconds; no deadline when absent
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the append-only link log
    #[serde(rename = "link-log-path", default = "default_link_log_path")]
    pub link_log_path: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: default_seed_url(),
            fetch_workers: default_fetch_workers(),
            extraction_workers: default_extraction_workers(),
            request_timeout_secs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            link_log_path: default_link_log_path(),
        }
    }
}

fn default_seed_url() -> String {
    DEFAULT_SEED_URL.to_string()
}

fn default_fetch_workers() -> u32 {
    16
}

fn default_extraction_workers() -> u32 {
    4
}

fn default_link_log_path() -> String {
    DEFAULT_LINK_LOG_PATH.to_string()
}
