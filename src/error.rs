//! Error types for web-fetch
//!
//! Two layers of errors exist:
//! - [`Error`] covers startup problems (invalid configuration, HTTP client construction)
//!   and is the only error a caller of the batch API ever receives as `Err`.
//! - [`FetchError`] describes the failure of a single page or image. It is reported and
//!   collected, never propagated as a batch failure.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for web-fetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for web-fetch
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_concurrent_pages")
        key: Option<String>,
    },

    /// The shared HTTP client could not be constructed
    #[error("failed to build HTTP client: {}", error_chain(.0))]
    Client(#[source] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of one page or one image, tagged with the URL it concerns
#[derive(Clone, Debug, Error, Serialize)]
#[error("failed to fetch {url}: {kind}")]
pub struct FetchError {
    /// The URL whose fetch failed
    pub url: String,
    /// What went wrong
    pub kind: FetchErrorKind,
}

/// Cause of a [`FetchError`]
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Server answered with a status of 400 or above
    #[error("fetch failed: status {code}")]
    Status {
        /// HTTP status code
        code: u16,
    },

    /// Connection refused, timeout, DNS failure, or an interrupted body
    #[error("network error: {message}")]
    Network {
        /// Cause chain of the underlying client error
        message: String,
    },

    /// Directory creation or file write failed
    #[error("filesystem error at {}: {message}", .path.display())]
    Filesystem {
        /// Path that could not be created or written
        path: PathBuf,
        /// Description of the I/O error
        message: String,
    },

    /// Response body is malformed in its declared (or default UTF-8) encoding
    #[error("could not decode body as text: {message}")]
    Decode {
        /// Description of the decoding error
        message: String,
    },

    /// URL cannot be requested or named: unparseable, unsupported scheme, or no host
    #[error("invalid URL: {message}")]
    InvalidUrl {
        /// What is wrong with the URL
        message: String,
    },
}

impl FetchError {
    /// Failure caused by an HTTP error status
    pub fn status(url: impl Into<String>, code: u16) -> Self {
        Self {
            url: url.into(),
            kind: FetchErrorKind::Status { code },
        }
    }

    /// Failure reported by the HTTP client
    ///
    /// Requests the client refused to build (bad URL or scheme) become
    /// [`FetchErrorKind::InvalidUrl`]; connect, timeout and body errors become
    /// [`FetchErrorKind::Network`].
    pub fn network(url: impl Into<String>, err: &reqwest::Error) -> Self {
        let message = error_chain(err);
        let kind = if err.is_builder() {
            FetchErrorKind::InvalidUrl { message }
        } else {
            FetchErrorKind::Network { message }
        };
        Self {
            url: url.into(),
            kind,
        }
    }

    /// Failure caused by a URL that cannot be used
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: FetchErrorKind::InvalidUrl {
                message: message.into(),
            },
        }
    }

    /// Failure caused by the local filesystem
    pub fn filesystem(
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        err: &std::io::Error,
    ) -> Self {
        Self {
            url: url.into(),
            kind: FetchErrorKind::Filesystem {
                path: path.into(),
                message: error_chain(err),
            },
        }
    }

    /// Failure caused by a body that is malformed in `encoding`
    pub fn decode(url: impl Into<String>, encoding: &str) -> Self {
        Self {
            url: url.into(),
            kind: FetchErrorKind::Decode {
                message: format!("invalid {encoding} byte sequence"),
            },
        }
    }

    /// HTTP status code, if this failure was an error status
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            FetchErrorKind::Status { code } => Some(code),
            _ => None,
        }
    }
}

/// Render an error and all of its sources as one line, outermost first.
///
/// reqwest errors keep the interesting part (e.g. "Connection refused") several
/// levels deep, so `to_string()` alone loses it.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
