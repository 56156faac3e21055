//! Dedup scheduler owning the set of visited URLs
//!
//! A URL is fetched at most once per run: only the first [`Scheduler::offer`] of a
//! normalized URL returns true, and only that caller schedules the fetch.

use crate::url::NormalizedUrl;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Scheduler manages the visited set for one crawl run
///
/// The set only grows. It lives for the run and is never persisted.
#[derive(Debug, Default)]
pub struct Scheduler {
    visited: Mutex<HashSet<NormalizedUrl>>,
}

impl Scheduler {
    /// Creates a scheduler with an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` visited, returning true iff it had not been offered before
    ///
    /// The check and the insert happen under one lock, so concurrent offers of the
    /// same URL produce exactly one `true`.
    pub fn offer(&self, url: &NormalizedUrl) -> bool {
        let first_seen = self
            .visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.clone());

        if !first_seen {
            tracing::trace!("Already visited: {}", url);
        }

        first_seen
    }

    /// Returns the number of distinct URLs offered so far
    pub fn visited_count(&self) -> usize {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
