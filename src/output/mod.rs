//! Output module for crawl results
//!
//! This module handles:
//! - The append-only link log written during the crawl
//! - Run statistics and the end-of-run summary

mod link_log;
pub mod stats;

pub use link_log::LinkLog;
pub use stats::{print_summary, CrawlStatistics, CrawlSummary};
