//! Mock web sites backed by wiremock

use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One mock host serving pages, images and error statuses
pub struct MockSite {
    /// Underlying mock server
    pub server: MockServer,
}

impl MockSite {
    /// Start a new site on a random localhost port
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Absolute URL for `route` on this site
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.server.uri(), route)
    }

    /// Host (with port) the pipeline derives for this site
    pub fn host(&self) -> String {
        let addr = self.server.address();
        format!("{}:{}", addr.ip(), addr.port())
    }

    /// Serve HTML at `route`
    pub async fn page(&self, route: &str, html: &str) -> &Self {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "text/html; charset=utf-8")
                    .set_body_string(html),
            )
            .mount(&self.server)
            .await;
        self
    }

    /// Serve raw bytes at `route`
    pub async fn asset(&self, route: &str, bytes: &[u8]) -> &Self {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
            .mount(&self.server)
            .await;
        self
    }

    /// Answer `route` with `status` and no body
    pub async fn status(&self, route: &str, status: u16) -> &Self {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
        self
    }

    /// Assert `route` is never requested
    pub async fn never(&self, route: &str) -> &Self {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.server)
            .await;
        self
    }
}

/// Names of regular files directly inside `dir`, sorted
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Image `src` values of a written page, in document order
pub fn image_sources(markup: &str) -> Vec<Option<String>> {
    let html = scraper::Html::parse_document(markup);
    let selector = scraper::Selector::parse("img").unwrap();
    html.select(&selector)
        .map(|img| img.value().attr("src").map(str::to_string))
        .collect()
}
