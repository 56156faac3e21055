//! Run statistics
//!
//! Counters are updated concurrently by fetch and extraction workers and frozen into
//! a [`CrawlSummary`] when the run ends.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::FetchError;

/// Live counters for one crawl run
#[derive(Debug, Default)]
pub struct CrawlStatistics {
    pages_fetched: AtomicU64,
    network_failures: AtomicU64,
    http_failures: AtomicU64,
    parse_failures: AtomicU64,
    in_scope_links: AtomicU64,
    out_of_scope_links: AtomicU64,
    malformed_links: AtomicU64,
    log_write_failures: AtomicU64,
}

impl CrawlStatistics {
    /// Creates a zeroed set of counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a page that was fetched and handed to extraction
    pub fn record_page_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an abandoned fetch
    pub fn record_fetch_failure(&self, error: &FetchError) {
        let counter = match error {
            FetchError::Network { .. } => &self.network_failures,
            FetchError::Http { .. } => &self.http_failures,
            FetchError::Parse { .. } => &self.parse_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an in-scope link written to the log
    pub fn record_in_scope_link(&self) {
        self.in_scope_links.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an out-of-scope link written to the log
    pub fn record_out_of_scope_link(&self) {
        self.out_of_scope_links.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an in-scope href that could not be normalized
    pub fn record_malformed_link(&self) {
        self.malformed_links.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a link record lost to a log write failure
    pub fn record_log_write_failure(&self) {
        self.log_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Freezes the counters into a summary
    pub fn summarize(
        &self,
        seed_url: &str,
        unique_urls: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> CrawlSummary {
        CrawlSummary {
            seed_url: seed_url.to_string(),
            started_at,
            finished_at,
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            network_failures: self.network_failures.load(Ordering::Relaxed),
            http_failures: self.http_failures.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            in_scope_links: self.in_scope_links.load(Ordering::Relaxed),
            out_of_scope_links: self.out_of_scope_links.load(Ordering::Relaxed),
            malformed_links: self.malformed_links.load(Ordering::Relaxed),
            log_write_failures: self.log_write_failures.load(Ordering::Relaxed),
            unique_urls: unique_urls as u64,
        }
    }
}

/// End-of-run report
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// The seed URL the run started from
    pub seed_url: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run reached quiescence
    pub finished_at: DateTime<Utc>,

    /// Pages fetched successfully and passed to extraction
    pub pages_fetched: u64,

    /// Fetches abandoned on transport errors
    pub network_failures: u64,

    /// Fetches abandoned on non-200 responses
    pub http_failures: u64,

    /// Fetches abandoned because the body was not HTML
    pub parse_failures: u64,

    /// In-scope links recorded (occurrences)
    pub in_scope_links: u64,

    /// Out-of-scope links recorded (occurrences)
    pub out_of_scope_links: u64,

    /// In-scope hrefs dropped because they could not be normalized
    pub malformed_links: u64,

    /// Link records lost to log write failures
    pub log_write_failures: u64,

    /// Distinct normalized URLs visited, seed included
    pub unique_urls: u64,
}

impl CrawlSummary {
    /// Total fetches abandoned for any reason
    pub fn fetch_failures(&self) -> u64 {
        self.network_failures + self.http_failures + self.parse_failures
    }

    /// Total fetches issued
    pub fn fetches_issued(&self) -> u64 {
        self.pages_fetched + self.fetch_failures()
    }

    /// Total link occurrences observed, whether or not the log write succeeded
    pub fn links_observed(&self) -> u64 {
        self.in_scope_links + self.out_of_scope_links
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Run:");
    println!("  Seed: {}", summary.seed_url);
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Duration: {:.2}s", summary.duration_seconds());
    println!();

    println!("Fetches:");
    println!("  Issued: {}", summary.fetches_issued());
    println!("  Succeeded: {}", summary.pages_fetched);
    println!("  Network errors: {}", summary.network_failures);
    println!("  HTTP errors: {}", summary.http_failures);
    println!("  Parse errors: {}", summary.parse_failures);
    println!();

    println!("Links:");
    println!("  Observed: {}", summary.links_observed());
    println!("  In scope: {}", summary.in_scope_links);
    println!("  Out of scope: {}", summary.out_of_scope_links);
    println!("  Malformed (skipped): {}", summary.malformed_links);
    println!("  Unique URLs visited: {}", summary.unique_urls);

    if summary.log_write_failures > 0 {
        println!("  Lost to log write errors: {}", summary.log_write_failures);
    }
}
