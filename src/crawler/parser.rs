//! HTML parsing and link extraction
//!
//! A fetched body becomes a [`ParsedDocument`]; [`LinkExtractor`] walks it and yields
//! every anchor href in document order together with its scope.

use crate::crawler::fetcher::FetchedPage;
use crate::url::{classify, LinkScope, NormalizedUrl};
use crate::CrawlError;
use scraper::{Html, Selector};

/// In-memory DOM tree of one fetched page
///
/// The tree is not `Send`; it is built and consumed on the same extraction worker.
pub struct ParsedDocument {
    url: NormalizedUrl,
    html: Html,
}

impl ParsedDocument {
    /// Parses a fetched page into a DOM tree
    ///
    /// HTML parsing is error-tolerant, so any body yields a tree.
    pub fn parse(page: FetchedPage) -> Self {
        Self {
            html: Html::parse_document(&page.body),
            url: page.url,
        }
    }

    /// The URL the document was fetched from
    pub fn url(&self) -> &NormalizedUrl {
        &self.url
    }
}

/// One anchor href as written in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// The raw `href` attribute value
    pub href: String,

    /// Whether the href may be fetched
    pub scope: LinkScope,
}

/// Finds anchor hrefs in parsed documents
pub struct LinkExtractor {
    anchors: Selector,
}

impl LinkExtractor {
    /// Creates an extractor matching `<a>` elements that carry an `href`
    pub fn new() -> Result<Self, CrawlError> {
        let anchors =
            Selector::parse("a[href]").map_err(|e| CrawlError::Selector(format!("{:?}", e)))?;
        Ok(Self { anchors })
    }

    /// Lazily yields every anchor href of `document`
    ///
    /// Elements are visited depth-first in document order. Anchors without an
    /// `href` yield nothing. Hrefs are not deduplicated.
    ///
    /// # Example
    ///
    /// ```
    /// use linktrawl::crawler::{FetchedPage, LinkExtractor, ParsedDocument};
    /// use linktrawl::url::{normalize, LinkScope};
    ///
    /// let page = FetchedPage {
    ///     url: normalize("/", "https://example.com").unwrap(),
    ///     body: r##"<a href="/about">About</a><a href="https://other.example">x</a>"##.to_string(),
    /// };
    /// let document = ParsedDocument::parse(page);
    /// let extractor = LinkExtractor::new().unwrap();
    ///
    /// let scopes: Vec<LinkScope> = extractor.extract(&document).map(|l| l.scope).collect();
    /// assert_eq!(scopes, vec![LinkScope::InScope, LinkScope::OutOfScope]);
    /// ```
    pub fn extract<'a>(
        &'a self,
        document: &'a ParsedDocument,
    ) -> impl Iterator<Item = ExtractedLink> + 'a {
        document
            .html
            .root_element()
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .map(|href| ExtractedLink {
                href: href.to_string(),
                scope: classify(href),
            })
    }
}
