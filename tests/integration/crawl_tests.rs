//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end: root fetch, downloads, nested rounds
//! and pruning of the save directory.

use media_harvest::config::{Config, LinkPattern};
use media_harvest::crawler::Coordinator;
use media_harvest::{run_crawl, CrawlPhase, CrawlRequest, HarvestError, TransportError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `<html><body><img src="/file/zipped1.png"></body></html>`, gzip-compressed
const GZIPPED_PAGE: &[u8] = &[
    0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0xb3, 0xc9, 0x28, 0xc9, 0xcd,
    0xb1, 0xb3, 0x49, 0xca, 0x4f, 0xa9, 0xb4, 0xb3, 0xc9, 0xcc, 0x4d, 0x57, 0x28, 0x2e, 0x4a,
    0xb6, 0x55, 0xd2, 0x4f, 0xcb, 0xcc, 0x49, 0xd5, 0xaf, 0xca, 0x2c, 0x28, 0x48, 0x4d, 0x31,
    0xd4, 0x2b, 0xc8, 0x4b, 0x57, 0xb2, 0xb3, 0xd1, 0x87, 0xa8, 0xd1, 0x07, 0x6b, 0x00, 0x00,
    0xf8, 0x37, 0x7e, 0xf8, 0x37, 0x00, 0x00, 0x00,
];

/// Mounts an HTML page at `page_path`
async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a binary media file at `file_path`
async fn mount_media(server: &MockServer, file_path: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(file_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(bytes)
                .insert_header("content-type", "application/octet-stream"),
        )
        .mount(server)
        .await;
}

fn files_in(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().is_file())
        .count()
}

#[tokio::test]
async fn test_single_page_crawl() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body>
        <img src="/file/a1.png">
        <img src="/file/b2.JPG">
        <img src="/file/missing.gif">
        <a href="/file/page.html">more</a>
        </body></html>"#,
    )
    .await;
    mount_media(&server, "/file/a1.png", vec![1u8; 1500]).await;
    mount_media(&server, "/file/b2.JPG", vec![2u8; 1500]).await;
    Mock::given(method("GET"))
        .and(path("/file/missing.gif"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let save_path = dir.path().join("out");
    let request = CrawlRequest::new(format!("{}/", server.uri()), &save_path);

    let aggregate = run_crawl(&Config::default(), &request)
        .await
        .expect("crawl should succeed");

    assert_eq!(aggregate.pages_visited, 1);
    assert_eq!(aggregate.urls_found, 4);
    assert_eq!(aggregate.processed, 4);
    assert_eq!(aggregate.succeeded, 2);
    assert_eq!(aggregate.failed, 1);
    assert_eq!(aggregate.invalid, 0);
    assert_eq!(aggregate.no_extension, 1);
    assert!(aggregate.failed_urls[0].ends_with("/file/missing.gif"));
    assert!(aggregate.no_extension_urls[0].ends_with("/file/page.html"));

    assert!(save_path.is_dir());
    assert_eq!(files_in(&save_path), 2);
}

#[tokio::test]
async fn test_nested_crawl_follows_same_origin_pages() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/file/gallery.html">gallery</a> <video src="/file/c3.mp4"></video>"#,
    )
    .await;

    // gallery and other link to each other; each is fetched exactly once
    Mock::given(method("GET"))
        .and(path("/file/gallery.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<audio src="/file/d4.mp3"></audio> <a href="/file/other.html">next</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file/other.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/file/gallery.html">back</a> <img src="/file/e5.gif">"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    mount_media(&server, "/file/c3.mp4", vec![3u8; 100]).await;
    mount_media(&server, "/file/d4.mp3", vec![4u8; 100]).await;
    mount_media(&server, "/file/e5.gif", vec![5u8; 100]).await;

    let dir = TempDir::new().unwrap();
    let request =
        CrawlRequest::new(format!("{}/", server.uri()), dir.path()).with_nested(true);

    let aggregate = run_crawl(&Config::default(), &request).await.unwrap();

    assert_eq!(aggregate.pages_visited, 3);
    assert_eq!(aggregate.succeeded, 3);
    assert_eq!(aggregate.failed, 0);
    assert!(aggregate.page_failures.is_empty());
    assert_eq!(
        aggregate.processed,
        aggregate.succeeded + aggregate.failed + aggregate.invalid + aggregate.no_extension
    );
    assert_eq!(files_in(dir.path()), 3);
}

#[tokio::test]
async fn test_nested_links_ignored_without_flag() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/file/gallery.html">gallery</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/file/gallery.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/", server.uri()), dir.path());

    let aggregate = run_crawl(&Config::default(), &request).await.unwrap();

    assert_eq!(aggregate.pages_visited, 1);
    assert_eq!(aggregate.no_extension, 1);
}

#[tokio::test]
async fn test_nested_page_failure_is_recorded() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/file/broken.html">x</a> <img src="/file/ok1.png">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/file/broken.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_media(&server, "/file/ok1.png", vec![7u8; 64]).await;

    let dir = TempDir::new().unwrap();
    let request =
        CrawlRequest::new(format!("{}/", server.uri()), dir.path()).with_nested(true);

    let aggregate = run_crawl(&Config::default(), &request).await.unwrap();

    assert_eq!(aggregate.pages_visited, 1);
    assert_eq!(aggregate.succeeded, 1);
    assert_eq!(aggregate.page_failures.len(), 1);
    assert!(aggregate.page_failures[0].url.ends_with("/file/broken.html"));
}

#[tokio::test]
async fn test_root_failure_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/", server.uri()), dir.path());

    let mut coordinator = Coordinator::new(&Config::default()).unwrap();
    let result = coordinator.run(&request).await;

    assert!(matches!(
        result,
        Err(HarvestError::Transport(TransportError::Status { status: 500, .. }))
    ));
    assert_eq!(coordinator.phase(), CrawlPhase::Failed);
}

#[tokio::test]
async fn test_page_without_links() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<html><body>nothing here</body></html>").await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/", server.uri()), dir.path()).with_nested(true);

    let mut coordinator = Coordinator::new(&Config::default()).unwrap();
    let aggregate = coordinator.run(&request).await.unwrap();

    assert_eq!(aggregate.urls_found, 0);
    assert_eq!(aggregate.processed, 0);
    assert_eq!(coordinator.phase(), CrawlPhase::Done);
}

#[tokio::test]
async fn test_gzip_encoded_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(GZIPPED_PAGE.to_vec())
                .insert_header("content-encoding", "gzip")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;
    mount_media(&server, "/file/zipped1.png", vec![8u8; 32]).await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/", server.uri()), dir.path());

    let aggregate = run_crawl(&Config::default(), &request).await.unwrap();

    assert_eq!(aggregate.urls_found, 1);
    assert_eq!(aggregate.succeeded, 1);
}

#[tokio::test]
async fn test_small_files_and_duplicates_pruned() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<img src="/file/a.png"><img src="/file/b.png"><img src="/file/c.png"><img src="/file/t.png">"#,
    )
    .await;
    mount_media(&server, "/file/a.png", vec![1u8; 3000]).await;
    mount_media(&server, "/file/b.png", vec![1u8; 3000]).await;
    mount_media(&server, "/file/c.png", vec![2u8; 3000]).await;
    mount_media(&server, "/file/t.png", vec![3u8; 10]).await;

    let dir = TempDir::new().unwrap();
    let request =
        CrawlRequest::new(format!("{}/", server.uri()), dir.path()).with_min_size_kb(1);

    let aggregate = run_crawl(&Config::default(), &request).await.unwrap();

    assert_eq!(aggregate.succeeded, 4);
    assert_eq!(aggregate.small_files_removed, 1);
    assert_eq!(aggregate.duplicates_removed, 1);
    assert!(aggregate.prune_failures.is_empty());
    assert_eq!(files_in(dir.path()), 2);
}

#[tokio::test]
async fn test_url_file_names_and_custom_pattern() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "poster: media/42.png").await;
    mount_media(&server, "/media/42.png", vec![6u8; 16]).await;

    let mut config = Config::default();
    config.download.use_url_as_filename = true;
    config.extraction.patterns = vec![LinkPattern {
        regex: r"/?media/\d+\.png".to_string(),
        prefix: Some(format!("{}/", server.uri())),
    }];

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/", server.uri()), dir.path());

    let aggregate = run_crawl(&config, &request).await.unwrap();

    assert_eq!(aggregate.succeeded, 1);
    assert!(dir.path().join("42.png").is_file());
}
