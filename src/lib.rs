//! # web-fetch
//!
//! Concurrent page fetcher that mirrors web pages and their images to disk.
//!
//! For every input URL the pipeline fetches the page, collects its links and images,
//! downloads the images into `{host}_assets/`, rewrites the page so its images point at
//! the local copies, and writes the result to `{host}.html`. Links are reported but
//! never followed.
//!
//! ## Design Philosophy
//!
//! - **Failure isolation** - one bad page never aborts the batch, one bad image never
//!   fails its page
//! - **Library-first** - argument parsing and directory validation belong to the caller
//! - **Event-driven** - consumers may subscribe to per-page and per-image events
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let results = web_fetch::fetch_urls(
//!         ["https://example.com/", "https://www.rust-lang.org/"],
//!         Path::new("./mirror"),
//!     )
//!     .await?;
//!
//!     for page in &results {
//!         println!("{}: {} images, {} links", page.host, page.images.len(), page.links.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Fetch pipeline (orchestrator, page, assets)
pub mod fetcher;
/// HTML extraction and rewriting
pub mod markup;
/// Result and event types
pub mod types;
/// Utility functions
pub mod utils;

use std::path::Path;

// Re-export commonly used types
pub use config::{Config, SameHostPolicy};
pub use error::{Error, FetchError, FetchErrorKind, Result};
pub use fetcher::WebFetcher;
pub use markup::Document;
pub use types::{Event, FetchResult};

/// Fetch `urls` into `output_dir` with the default configuration
///
/// Returns the pages that succeeded, in completion order. Failed pages are logged and
/// omitted.
///
/// # Errors
///
/// Only fails when the fetcher itself cannot start (see [`WebFetcher::new`]).
pub async fn fetch_urls<I, S>(urls: I, output_dir: &Path) -> Result<Vec<FetchResult>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fetcher = WebFetcher::new(Config::default())?;
    Ok(fetcher.fetch_urls(urls, output_dir).await)
}
