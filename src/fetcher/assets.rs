//! Single image download into an asset directory.

use std::path::{Path, PathBuf};

use crate::error::FetchError;
use crate::utils::asset_path;

use super::WebFetcher;

impl WebFetcher {
    /// Download `url` into `destination_dir`, named by
    /// [`asset_file_name`](crate::utils::asset_file_name)
    ///
    /// An existing file with the same name is overwritten. Error statuses (400 and
    /// above), network failures and write failures all come back as [`FetchError`];
    /// nothing is written on failure.
    pub async fn download_asset(
        &self,
        url: &str,
        destination_dir: &Path,
    ) -> Result<PathBuf, FetchError> {
        tracing::debug!(url, "fetching asset");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(url, &e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(FetchError::status(url, status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(url, &e))?;

        let path = asset_path(destination_dir, url);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| FetchError::filesystem(url, &path, &e))?;

        tracing::debug!(url, path = %path.display(), bytes = bytes.len(), "asset saved");
        Ok(path)
    }
}
