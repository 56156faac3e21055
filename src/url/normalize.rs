use crate::url::{classify, LinkScope, NormalizedUrl};
use crate::UrlError;
use url::Url;

/// Normalizes an href against the crawl origin
///
/// # Normalization Steps
///
/// 1. In-scope hrefs (`/...`, `#...`) are appended to `origin`; any other href is
///    taken as-is
/// 2. Parse the result as an absolute URL; reject if malformed
/// 3. Remove the query string
/// 4. Remove the fragment
///
/// Already-normalized URLs pass through unchanged, so normalizing twice is a no-op.
/// Fetch eligibility is decided by [`classify`], not here.
///
/// # Arguments
///
/// * `href` - The raw href as written in the document
/// * `origin` - The crawl origin, `scheme://host[:port]` with no trailing slash
///
/// # Examples
///
/// ```
/// use linktrawl::url::normalize;
///
/// let url = normalize("/about?ref=nav", "https://example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
///
/// let top = normalize("#top", "https://example.com").unwrap();
/// assert_eq!(top.as_str(), "https://example.com/");
/// ```
pub fn normalize(href: &str, origin: &str) -> Result<NormalizedUrl, UrlError> {
    let candidate = match classify(href) {
        LinkScope::InScope => format!("{}{}", origin, href),
        LinkScope::OutOfScope => href.to_string(),
    };

    let mut url = Url::parse(&candidate).map_err(|source| UrlError::Malformed {
        href: candidate.clone(),
        source,
    })?;

    url.set_query(None);
    url.set_fragment(None);

    Ok(NormalizedUrl(url.into()))
}

/// Extracts the crawl origin (`scheme://host[:port]`) from a seed URL
///
/// Fails for URLs without a tuple origin such as `data:` or `file:` URLs.
pub fn origin_of(seed: &str) -> Result<String, UrlError> {
    let url = Url::parse(seed).map_err(|source| UrlError::Malformed {
        href: seed.to_string(),
        source,
    })?;

    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(UrlError::NoOrigin(seed.to_string()));
    }

    Ok(origin.ascii_serialization())
}
