//! Shared test helpers for creating WebFetcher instances and mock sites in tests.

use crate::config::Config;
use crate::fetcher::WebFetcher;
use crate::types::Event;
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Tiny PNG-ish payload; content is irrelevant, only bytes on disk are checked
pub(crate) const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

/// Helper to create a test WebFetcher with the given config and a fresh output dir.
/// Returns the fetcher and the tempdir (which must be kept alive).
pub(crate) fn create_test_fetcher(config: Config) -> (WebFetcher, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let fetcher = WebFetcher::new(config).unwrap();
    (fetcher, temp_dir)
}

/// Authority the pipeline will derive for pages served by `server`
pub(crate) fn host_of(server: &MockServer) -> String {
    let addr = server.address();
    format!("{}:{}", addr.ip(), addr.port())
}

/// Serve `body` as HTML at `route`
pub(crate) async fn mount_page(server: &MockServer, route: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .set_body_string(body.into()),
        )
        .mount(server)
        .await;
}

/// Serve raw bytes at `route`
pub(crate) async fn mount_bytes(server: &MockServer, route: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

/// Answer `route` with a bare status code
pub(crate) async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// A port on localhost with nothing listening on it
pub(crate) fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Number of regular files directly inside `dir`
pub(crate) fn file_count(dir: &Path) -> usize {
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}

/// Image `src` values of a serialized document, in document order
pub(crate) fn image_sources(markup: &str) -> Vec<Option<String>> {
    let html = scraper::Html::parse_document(markup);
    let selector = scraper::Selector::parse("img").unwrap();
    html.select(&selector)
        .map(|img| img.value().attr("src").map(str::to_string))
        .collect()
}

/// Drain every event currently buffered in `rx`
pub(crate) fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
