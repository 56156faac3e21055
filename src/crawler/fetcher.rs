//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client
//! - GET requests for normalized URLs
//! - Classifying failures as network, HTTP status, or unparseable body

use crate::config::CrawlerConfig;
use crate::url::NormalizedUrl;
use crate::FetchError;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use std::time::Duration;

/// A page whose body is ready for HTML parsing
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: NormalizedUrl,

    /// Decoded response body
    pub body: String,
}

/// Builds the HTTP client shared by every fetch worker
///
/// No headers are added beyond the client defaults. A per-request deadline is set
/// only when `request_timeout_secs` is configured.
///
/// # Example
///
/// ```
/// use linktrawl::config::CrawlerConfig;
/// use linktrawl::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a URL and validates that the response is an HTML page
///
/// # Failure Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | Transport failure, body read failure, timeout | `FetchError::Network` |
/// | Status other than 200 | `FetchError::Http` |
/// | Content-Type present and not HTML | `FetchError::Parse` |
/// | UTF-8 body (declared or by default) with invalid bytes | `FetchError::Parse` |
///
/// A body whose Content-Type declares another charset is decoded from that charset.
///
/// Redirects are followed by the client; the status of the final response counts.
pub async fn fetch_page(client: &Client, url: &NormalizedUrl) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(content_type) = &content_type {
        if !is_html_content_type(content_type) {
            return Err(FetchError::Parse {
                url: url.to_string(),
                message: format!("expected HTML, got {}", content_type),
            });
        }
    }

    let network_error = |source| FetchError::Network {
        url: url.to_string(),
        source,
    };

    let body = if declares_foreign_charset(content_type.as_deref()) {
        response.text().await.map_err(network_error)?
    } else {
        let bytes = response.bytes().await.map_err(network_error)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| FetchError::Parse {
            url: url.to_string(),
            message: format!("body is not valid UTF-8: {}", e.utf8_error()),
        })?
    };

    Ok(FetchedPage {
        url: url.clone(),
        body,
    })
}

/// Returns true for Content-Type values an HTML parser can handle
fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Returns true when the Content-Type names a charset other than UTF-8
fn declares_foreign_charset(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };

    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_ascii_lowercase())
        .is_some_and(|charset| charset != "utf-8" && charset != "utf8")
}
