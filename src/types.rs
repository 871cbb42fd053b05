//! Core types for web-fetch

use serde::Serialize;
use std::path::PathBuf;

use crate::error::FetchError;

/// Outcome of one successfully fetched page
///
/// Built once when the page's pipeline finishes and never modified afterwards.
#[derive(Clone, Debug, Serialize)]
pub struct FetchResult {
    /// URL as supplied by the caller
    pub url: String,
    /// URL of the response after redirects
    pub final_url: String,
    /// Authority of `final_url` (host, plus port when one is explicit)
    pub host: String,
    /// Page markup as fetched, before image sources were rewritten
    pub body: String,
    /// Absolute `href` targets of the page's anchors, in document order
    pub links: Vec<String>,
    /// Absolute `src` targets of the page's images, in document order
    pub images: Vec<String>,
    /// Where the rewritten page was written
    pub page_path: PathBuf,
    /// Images that could not be saved; the page still references their local paths
    pub asset_errors: Vec<FetchError>,
}

impl FetchResult {
    /// Number of images that were saved to the asset directory
    pub fn saved_assets(&self) -> usize {
        self.images.len().saturating_sub(self.asset_errors.len())
    }
}

/// Event emitted while a batch is running
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Page fetched, rewritten and written to disk
    PageFetched {
        /// Requested URL
        url: String,
        /// Resolved host
        host: String,
        /// Path of the written page
        path: PathBuf,
    },

    /// Page failed at a terminal step
    PageFailed {
        /// Requested URL
        url: String,
        /// Human-readable cause
        error: String,
    },

    /// Image saved to an asset directory
    AssetSaved {
        /// Page the image belongs to
        page_url: String,
        /// Image URL
        url: String,
        /// Written file
        path: PathBuf,
    },

    /// Image download failed (the page continues)
    AssetFailed {
        /// Page the image belongs to
        page_url: String,
        /// Image URL
        url: String,
        /// Human-readable cause
        error: String,
    },
}
