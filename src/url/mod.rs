//! URL handling module for Linktrawl
//!
//! This module provides href classification, the normalized URL type used as the
//! dedup key, and normalization against the crawl origin.

mod normalize;

use std::fmt;

// Re-export main functions
pub use normalize::{normalize, origin_of};

/// Whether an href is eligible for fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Root-relative (`/...`) or fragment (`#...`) link, resolved against the origin
    InScope,
    /// Anything else; recorded verbatim but never fetched
    OutOfScope,
}

impl LinkScope {
    /// Returns true if links of this scope may be fetched
    pub fn is_fetchable(&self) -> bool {
        matches!(self, Self::InScope)
    }
}

/// Classifies a raw href
///
/// An href is in scope iff it starts with `#` or `/`. Nothing else about the href is
/// inspected, so `//cdn.example.com/x` counts as in scope and `about` does not.
///
/// # Examples
///
/// ```
/// use linktrawl::url::{classify, LinkScope};
///
/// assert_eq!(classify("/about"), LinkScope::InScope);
/// assert_eq!(classify("#top"), LinkScope::InScope);
/// assert_eq!(classify("https://external.example"), LinkScope::OutOfScope);
/// ```
pub fn classify(href: &str) -> LinkScope {
    if href.starts_with('#') || href.starts_with('/') {
        LinkScope::InScope
    } else {
        LinkScope::OutOfScope
    }
}

/// An absolute URL with no query and no fragment
///
/// Two hrefs that normalize to the same value denote the same crawl target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
