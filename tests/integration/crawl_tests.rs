//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use linktrawl::config::{Config, CrawlerConfig, OutputConfig};
use linktrawl::output::CrawlSummary;
use linktrawl::{crawl, ConfigError, CrawlError, FetchError};
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `seed_url` and logging into `dir`
fn create_test_config(seed_url: &str, dir: &TempDir) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed_url.to_string(),
            fetch_workers: 4,
            extraction_workers: 2,
            request_timeout_secs: Some(10),
        },
        output: OutputConfig {
            link_log_path: dir.path().join("links.txt").to_string_lossy().into_owned(),
        },
    }
}

/// Builds an HTML page containing one anchor per href
fn page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

/// Mounts an HTML page at `route` that must be fetched exactly once
async fn mount_page(server: &MockServer, route: &str, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page(hrefs), "text/html"))
        .expect(1)
        .mount(server)
        .await;
}

async fn run(config: Config) -> Result<CrawlSummary, CrawlError> {
    tokio::time::timeout(Duration::from_secs(30), crawl(config))
        .await
        .expect("crawl should terminate")
}

fn read_log(dir: &TempDir) -> Vec<String> {
    std::fs::read_to_string(dir.path().join("links.txt"))
        .expect("link log should exist")
        .lines()
        .map(str::to_string)
        .collect()
}

fn occurrences(lines: &[String], expected: &str) -> usize {
    lines.iter().filter(|line| line.as_str() == expected).count()
}

#[tokio::test]
async fn test_seed_with_about_fragment_and_external_link() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempdir().unwrap();

    mount_page(&server, "/", &["/about", "#top", "https://external.example"]).await;
    mount_page(&server, "/about", &[]).await;

    let summary = run(create_test_config(&base, &dir)).await.unwrap();

    assert_eq!(
        read_log(&dir),
        vec![
            format!("{}/about", base),
            format!("{}/", base),
            "https://external.example".to_string(),
        ]
    );
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.fetch_failures(), 0);
    assert_eq!(summary.unique_urls, 2);
    assert_eq!(summary.out_of_scope_links, 1);
}

#[tokio::test]
async fn test_cyclic_graph_fetches_each_page_once() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/", &["/a", "/b"]).await;
    mount_page(&server, "/a", &["/b", "/"]).await;
    mount_page(&server, "/b", &["/a", "/c", "/b"]).await;
    mount_page(&server, "/c", &["/", "/a"]).await;

    let summary = run(create_test_config(&server.uri(), &dir)).await.unwrap();

    assert_eq!(summary.pages_fetched, 4);
    assert_eq!(summary.fetches_issued(), 4);
    assert_eq!(summary.unique_urls, 4);
    assert_eq!(summary.in_scope_links, 9);
}

#[tokio::test]
async fn test_every_link_occurrence_is_logged() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempdir().unwrap();

    mount_page(
        &server,
        "/",
        &[
            "/x",
            "https://external.example",
            "/x",
            "mailto:someone@example.com",
            "/x",
            "https://external.example",
        ],
    )
    .await;
    mount_page(&server, "/x", &["/"]).await;

    let summary = run(create_test_config(&base, &dir)).await.unwrap();
    let lines = read_log(&dir);

    assert_eq!(lines.len(), 7);
    assert_eq!(occurrences(&lines, &format!("{}/x", base)), 3);
    assert_eq!(occurrences(&lines, "https://external.example"), 2);
    assert_eq!(occurrences(&lines, "mailto:someone@example.com"), 1);
    assert_eq!(occurrences(&lines, &format!("{}/", base)), 1);
    assert_eq!(summary.links_observed(), 7);
}

#[tokio::test]
async fn test_failed_branch_does_not_stop_siblings() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/", &["/broken", "/ok"]).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", &["/deep"]).await;
    mount_page(&server, "/deep", &["/broken"]).await;

    let summary = run(create_test_config(&server.uri(), &dir)).await.unwrap();

    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.http_failures, 1);
    assert_eq!(summary.fetches_issued(), 4);
}

#[tokio::test]
async fn test_non_html_page_is_skipped() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/", &["/data.json", "/next"]).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a": 1}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/next", &[]).await;

    let summary = run(create_test_config(&server.uri(), &dir)).await.unwrap();

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.parse_failures, 1);
}

#[tokio::test]
async fn test_query_and_fragment_variants_fetch_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempdir().unwrap();

    mount_page(&server, "/", &["/p?x=1", "/p?x=2", "/p#section", "/p"]).await;
    mount_page(&server, "/p", &["/p?page=2"]).await;

    let summary = run(create_test_config(&base, &dir)).await.unwrap();
    let lines = read_log(&dir);

    assert_eq!(occurrences(&lines, &format!("{}/p", base)), 5);
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.unique_urls, 2);
}

#[tokio::test]
async fn test_single_worker_pools_drain_long_chain() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let routes: Vec<String> = (0..10).map(|i| format!("/chain/{}", i)).collect();
    mount_page(&server, "/", &[routes[0].as_str()]).await;
    for (i, route) in routes.iter().enumerate() {
        let next: Vec<&str> = routes.get(i + 1).map(String::as_str).into_iter().collect();
        mount_page(&server, route, &next).await;
    }

    let mut config = create_test_config(&server.uri(), &dir);
    config.crawler.fetch_workers = 1;
    config.crawler.extraction_workers = 1;

    let summary = run(config).await.unwrap();

    assert_eq!(summary.pages_fetched, 11);
    assert_eq!(summary.unique_urls, 11);
}

#[tokio::test]
async fn test_wide_fan_out_fetches_every_page_once() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let routes: Vec<String> = (0..40).map(|i| format!("/item/{}", i)).collect();
    let hrefs: Vec<&str> = routes.iter().map(String::as_str).collect();
    mount_page(&server, "/", &hrefs).await;
    for route in &routes {
        // Every page links back to all siblings.
        mount_page(&server, route, &hrefs).await;
    }

    let summary = run(create_test_config(&server.uri(), &dir)).await.unwrap();

    assert_eq!(summary.pages_fetched, 41);
    assert_eq!(summary.in_scope_links, 40 * 41);
    assert_eq!(read_log(&dir).len(), 40 * 41);
}

#[tokio::test]
async fn test_existing_log_is_appended() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("links.txt"), "earlier-run\n").unwrap();

    mount_page(&server, "/", &["https://external.example"]).await;

    run(create_test_config(&base, &dir)).await.unwrap();

    assert_eq!(
        read_log(&dir),
        vec![
            "earlier-run".to_string(),
            "https://external.example".to_string()
        ]
    );
}

#[tokio::test]
async fn test_seed_http_error_is_fatal() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = run(create_test_config(&server.uri(), &dir))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CrawlError::SeedUnreachable {
            source: FetchError::Http { status: 500, .. },
            ..
        }
    ));
    assert!(!dir.path().join("links.txt").exists());
}

#[tokio::test]
async fn test_unreachable_seed_is_fatal() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let dir = tempdir().unwrap();

    let err = run(create_test_config(&format!("http://127.0.0.1:{}", port), &dir))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CrawlError::SeedUnreachable {
            source: FetchError::Network { .. },
            ..
        }
    ));
    assert!(!dir.path().join("links.txt").exists());
}

#[tokio::test]
async fn test_unwritable_log_does_not_stop_fetching() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/", &["/a", "https://external.example"]).await;
    mount_page(&server, "/a", &["/b", "/"]).await;
    mount_page(&server, "/b", &[]).await;

    let mut config = create_test_config(&server.uri(), &dir);
    config.output.link_log_path = dir
        .path()
        .join("missing-dir")
        .join("links.txt")
        .to_string_lossy()
        .into_owned();

    let summary = run(config).await.unwrap();

    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.links_observed(), 4);
    assert_eq!(summary.log_write_failures, 4);
    assert!(!dir.path().join("missing-dir").exists());
}

#[tokio::test]
async fn test_empty_worker_pool_is_rejected_before_fetching() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page(&[]), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri(), &dir);
    config.crawler.fetch_workers = 0;
    config.crawler.extraction_workers = 0;

    let err = run(config).await.unwrap_err();

    assert!(matches!(err, CrawlError::Config(ConfigError::Validation(_))));
    assert!(!dir.path().join("links.txt").exists());
}
