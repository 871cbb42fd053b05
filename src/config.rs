//! Configuration types for web-fetch

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Behavior when two pages in one batch resolve to the same host
///
/// Both pages write `{host}.html` and share `{host}_assets/`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameHostPolicy {
    /// Pages proceed independently; the last page to write wins
    #[default]
    LastWriteWins,
    /// Directory preparation, asset downloads, and page writes for one host run one page at a time
    Serialize,
}

/// Main configuration for [`WebFetcher`](crate::WebFetcher)
///
/// Every field has a default, so an empty JSON/TOML object is a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Total time allowed for one request, including the body (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Time allowed to establish a connection (default: 10 seconds)
    #[serde(default = "default_connect_timeout", with = "duration_serde")]
    pub connect_timeout: Duration,

    /// `User-Agent` header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Redirects followed before a request fails (default: 10)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Pages fetched at once (None = unbounded)
    #[serde(default)]
    pub max_concurrent_pages: Option<usize>,

    /// Images downloaded at once for a single page (None = unbounded)
    #[serde(default)]
    pub max_concurrent_assets: Option<usize>,

    /// Same-host handling within one batch
    #[serde(default)]
    pub same_host: SameHostPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            max_concurrent_pages: None,
            max_concurrent_assets: None,
            same_host: SameHostPolicy::default(),
        }
    }
}

impl Config {
    /// Check settings that would make the pipeline stall or fail every request
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_pages == Some(0) {
            return Err(config_error(
                "max_concurrent_pages",
                "max_concurrent_pages must be greater than 0",
            ));
        }
        if self.max_concurrent_assets == Some(0) {
            return Err(config_error(
                "max_concurrent_assets",
                "max_concurrent_assets must be greater than 0",
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(config_error(
                "request_timeout",
                "request_timeout must be greater than 0",
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(config_error(
                "connect_timeout",
                "connect_timeout must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Page concurrency as a buffer size for `buffer_unordered`
    pub(crate) fn page_limit(&self) -> usize {
        self.max_concurrent_pages.unwrap_or(usize::MAX)
    }

    /// Per-page image concurrency as a buffer size for `buffer_unordered`
    pub(crate) fn asset_limit(&self) -> usize {
        self.max_concurrent_assets.unwrap_or(usize::MAX)
    }
}

fn config_error(key: &str, message: &str) -> Error {
    Error::Config {
        message: message.to_string(),
        key: Some(key.to_string()),
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    concat!("web-fetch/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_redirects() -> usize {
    10
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
