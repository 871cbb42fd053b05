//! Single page pipeline: request, asset directory, downloads, rewrite, persist.

use std::path::Path;

use futures::StreamExt;

use crate::error::FetchError;
use crate::markup;
use crate::types::{Event, FetchResult};
use crate::utils::{assets_dir_name, authority, decode_body, ensure_dir, page_path};

use super::WebFetcher;

impl WebFetcher {
    /// Fetch one page and materialize it under `output_dir`
    ///
    /// Steps run strictly in order for this page:
    /// 1. GET `url`; an error status or network failure ends the page
    /// 2. Take the host from the final (post-redirect) URL
    /// 3. Ensure `{output_dir}/{host}_assets` exists
    /// 4. Read the body as text in its declared charset (UTF-8 when none is declared)
    /// 5. Extract links and images, resolved against `url`
    /// 6. Download every image concurrently; failures are collected, not fatal
    /// 7. Write the markup with rewritten image sources to `{output_dir}/{host}.html`
    ///
    /// The returned [`FetchResult`] carries the original body, not the rewritten one.
    pub async fn fetch_page(&self, url: &str, output_dir: &Path) -> Result<FetchResult, FetchError> {
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

        let final_url = response.url().clone();
        let host = authority(&final_url).ok_or_else(|| {
            FetchError::invalid_url(url, format!("response URL {final_url} has no host"))
        })?;
        tracing::debug!(url, host = %host, status, "page responded");

        // Held until the page is written so same-host pages don't interleave
        let _host_guard = self.lock_host(&host).await;

        let assets_name = assets_dir_name(&host);
        let assets_dir = output_dir.join(&assets_name);
        ensure_dir(&assets_dir)
            .await
            .map_err(|e| FetchError::filesystem(url, &assets_dir, &e))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(url, &e))?;
        let body = decode_body(&bytes, content_type.as_deref())
            .map_err(|encoding| FetchError::decode(url, encoding))?;

        let markup::ProcessedMarkup {
            links,
            images,
            rewritten,
        } = markup::process(&body, url, &assets_name);
        tracing::debug!(url, links = links.len(), images = images.len(), "markup extracted");

        let asset_errors = self.download_assets(url, &images, &assets_dir).await;

        let page_path = page_path(output_dir, &host);
        tokio::fs::write(&page_path, rewritten)
            .await
            .map_err(|e| FetchError::filesystem(url, &page_path, &e))?;

        Ok(FetchResult {
            url: url.to_string(),
            final_url: final_url.to_string(),
            host,
            body,
            links,
            images,
            page_path,
            asset_errors,
        })
    }

    /// Download all images of one page, returning the failures
    ///
    /// Every download is awaited before this returns, whatever the outcome.
    async fn download_assets(
        &self,
        page_url: &str,
        images: &[String],
        assets_dir: &Path,
    ) -> Vec<FetchError> {
        let mut downloads = futures::stream::iter(images)
            .map(|image| async move { (image, self.download_asset(image, assets_dir).await) })
            .buffer_unordered(self.config.asset_limit());

        let mut errors = Vec::new();
        while let Some((image, outcome)) = downloads.next().await {
            match outcome {
                Ok(path) => self.emit(Event::AssetSaved {
                    page_url: page_url.to_string(),
                    url: image.clone(),
                    path,
                }),
                Err(e) => {
                    tracing::warn!(page = page_url, url = %image, error = %e, "asset failed");
                    self.emit(Event::AssetFailed {
                        page_url: page_url.to_string(),
                        url: image.clone(),
                        error: e.to_string(),
                    });
                    errors.push(e);
                }
            }
        }
        errors
    }
}
