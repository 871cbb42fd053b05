//! Utility functions for URL, path and body handling

use encoding_rs::{Encoding, UTF_8};
use std::path::{Path, PathBuf};
use url::Url;

/// Suffix appended to a host to name its asset directory
pub const ASSETS_SUFFIX: &str = "_assets";

/// Final `/`-delimited segment of a URL or path
///
/// No decoding or normalization is applied, so a trailing slash yields an empty name.
///
/// # Examples
///
/// ```
/// use web_fetch::utils::basename;
///
/// assert_eq!(basename("https://cdn.example.com/path/to/pic.png"), "pic.png");
/// assert_eq!(basename("pic.png"), "pic.png");
/// assert_eq!(basename("https://example.com/dir/"), "");
/// ```
#[must_use]
pub fn basename(value: &str) -> &str {
    match value.rfind('/') {
        Some(idx) => &value[idx + 1..],
        None => value,
    }
}

/// Authority component of a URL: host, plus `:port` when the URL names one explicitly
///
/// Returns `None` for URLs without a host (`data:`, `file:` without host, ...).
#[must_use]
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Name of the asset directory for a host, relative to the output directory
#[must_use]
pub fn assets_dir_name(host: &str) -> String {
    format!("{host}{ASSETS_SUFFIX}")
}

/// Path of the rewritten page for a host
#[must_use]
pub fn page_path(output_dir: &Path, host: &str) -> PathBuf {
    output_dir.join(format!("{host}.html"))
}

/// File name an image is stored under, derived from its URL
///
/// Uses the last path segment of `url` (query and fragment excluded), percent-decoded.
/// Values that do not parse as absolute URLs fall back to their raw last segment.
/// Separators that decoding would introduce are replaced with `_` so the name never
/// leaves the asset directory. Both the downloader and the markup rewrite name files
/// through this function.
///
/// # Examples
///
/// ```
/// use web_fetch::utils::asset_file_name;
///
/// assert_eq!(asset_file_name("https://example.com/img/my%20pic.png"), "my pic.png");
/// assert_eq!(asset_file_name("https://example.com/pic.png?v=2"), "pic.png");
/// ```
#[must_use]
pub fn asset_file_name(url: &str) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) => basename(parsed.path()).to_string(),
        Err(_) => basename(url).to_string(),
    };
    let decoded = match urlencoding::decode(&segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.clone(),
    };
    decoded.replace(['/', '\\'], "_")
}

/// Path where an asset fetched from `url` is stored inside `dir`
#[must_use]
pub fn asset_path(dir: &Path, url: &str) -> PathBuf {
    dir.join(asset_file_name(url))
}

/// `charset` parameter of a `Content-Type` header value
///
/// Format: `text/html; charset="iso-8859-1"`
#[must_use]
pub fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|part| {
        let (name, value) = part.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then_some(value.trim().trim_matches('"'))
    })
}

/// Decode a response body as text
///
/// A byte order mark wins, then the charset declared in `content_type`, then UTF-8.
/// Unknown charset labels fall back to UTF-8. Bytes that are malformed in the chosen
/// encoding are rejected rather than replaced; the error names that encoding.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<String, &'static str> {
    let declared = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    let (encoding, text) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared.unwrap_or(UTF_8), bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(text)
        .map(|decoded| decoded.into_owned())
        .ok_or(encoding.name())
}

/// Create a directory (and parents) if missing; an existing directory is not an error
pub async fn ensure_dir(path: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(path).await
}
