//! Fetch pipeline split into focused submodules.
//!
//! The `WebFetcher` struct and its methods are organized by stage:
//! - [`assets`] - Single image download into an asset directory
//! - [`page`] - One page: request, asset directory, downloads, rewrite, persist
//! - this module - Batch orchestration over many pages
//!
//! Every in-flight operation is driven from the caller's task through unordered
//! buffers; nothing is spawned, so a finished batch leaves no work behind.

mod assets;
mod page;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;

use crate::config::{Config, SameHostPolicy};
use crate::error::{Error, Result};
use crate::types::{Event, FetchResult};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Per-host locks used by [`SameHostPolicy::Serialize`]
#[derive(Clone, Default)]
pub(crate) struct HostLocks {
    locks: Arc<std::sync::Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl HostLocks {
    /// Lock for `host`, created on first use
    pub(crate) fn get(&self, host: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(locks.entry(host.to_string()).or_default())
    }
}

/// Concurrent page fetcher (cloneable - all fields are cheap to clone)
#[derive(Clone)]
pub struct WebFetcher {
    /// Shared HTTP client (connection pool is internal to reqwest)
    pub(crate) client: reqwest::Client,
    /// Configuration (wrapped in Arc for sharing across operations)
    pub(crate) config: Arc<Config>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Per-host serialization when two pages resolve to the same host
    pub(crate) host_locks: HostLocks,
}

impl WebFetcher {
    /// Create a fetcher from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid settings and [`Error::Client`] when the
    /// HTTP client cannot be built (e.g. TLS backend initialization fails).
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(Error::Client)?;

        let (event_tx, _rx) = tokio::sync::broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            client,
            config: Arc::new(config),
            event_tx,
            host_locks: HostLocks::default(),
        })
    }

    /// Subscribe to pipeline events
    ///
    /// Events sent while nobody is subscribed are dropped.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch every URL into `output_dir` and return the pages that succeeded
    ///
    /// Pages run concurrently (bounded by `max_concurrent_pages` when set) and are
    /// handled as they complete, so the returned order is completion order. A failed
    /// page is logged, broadcast as [`Event::PageFailed`], and left out of the result;
    /// it never affects the other pages. `output_dir` must already exist.
    pub async fn fetch_urls<I, S>(&self, urls: I, output_dir: &Path) -> Vec<FetchResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        let total = urls.len();
        tracing::info!(total, output_dir = %output_dir.display(), "starting batch");

        let mut outcomes = futures::stream::iter(urls)
            .map(|url| async move {
                let outcome = self.fetch_page(&url, output_dir).await;
                (url, outcome)
            })
            .buffer_unordered(self.config.page_limit());

        let mut results = Vec::with_capacity(total);
        let mut failed = 0usize;
        while let Some((url, outcome)) = outcomes.next().await {
            match outcome {
                Ok(result) => {
                    tracing::info!(
                        url = %url,
                        host = %result.host,
                        images = result.images.len(),
                        links = result.links.len(),
                        "page saved"
                    );
                    self.emit(Event::PageFetched {
                        url,
                        host: result.host.clone(),
                        path: result.page_path.clone(),
                    });
                    results.push(result);
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(url = %url, error = %e, "page failed");
                    self.emit(Event::PageFailed {
                        url,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(total, succeeded = results.len(), failed, "batch finished");
        results
    }

    /// Broadcast an event; having no subscribers is fine
    pub(crate) fn emit(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Lock to hold while touching `host`'s output files, if the policy asks for one
    pub(crate) async fn lock_host(&self, host: &str) -> Option<tokio::sync::OwnedMutexGuard<()>> {
        match self.config.same_host {
            SameHostPolicy::LastWriteWins => None,
            SameHostPolicy::Serialize => Some(self.host_locks.get(host).lock_owned().await),
        }
    }
}
