//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and failure classification
//! - HTML parsing and link extraction
//! - Visited-set deduplication
//! - Pending-work tracking and overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod pending;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use parser::{ExtractedLink, LinkExtractor, ParsedDocument};
pub use pending::{PendingSnapshot, PendingWork, WorkKind, WorkTicket};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resolve the origin of the seed URL
/// 2. Build the HTTP client
/// 3. Fetch the seed and extract its links
/// 4. Fetch every first-seen in-scope link, recording all links to the link log
/// 5. Return once no fetch or extraction is outstanding
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl reached quiescence
/// * `Err(CrawlError)` - The seed was unreachable or the crawl could not start
pub async fn crawl(config: Config) -> Result<CrawlSummary, CrawlError> {
    run_crawl(config).await
}
