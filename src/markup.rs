//! HTML link/image extraction and image source rewriting.
//!
//! A page moves through three stages:
//! 1. [`Document::parse`] - tolerant parse, never fails
//! 2. [`Document::extract_links`] / [`Document::extract_images`] - pure queries,
//!    callable any number of times
//! 3. [`Document::rewrite_image_sources`] - consumes the document and returns the
//!    rewritten markup
//!
//! `Document` wraps `scraper::Html`, which is not `Send`. Keep it out of `.await`
//! points; the page pipeline finishes all three stages synchronously.

use html5ever::{LocalName, Namespace, QualName};
use scraper::{Html, Node};
use tracing::debug;
use url::Url;

use crate::utils::asset_file_name;

/// Parsed HTML document owned by one page operation
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse markup, recovering from any syntax errors
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    /// Absolute `href` of every `<a>` that has one, in document order
    ///
    /// Values are resolved against `base_url`; anchors without `href` are skipped.
    pub fn extract_links(&self, base_url: &str) -> Vec<String> {
        self.resolve_attribute("a", "href", base_url)
    }

    /// Absolute `src` of every `<img>` that has one, in document order
    pub fn extract_images(&self, base_url: &str) -> Vec<String> {
        self.resolve_attribute("img", "src", base_url)
    }

    /// Point every `<img>` at its local copy and serialize the document
    ///
    /// Each `src` becomes `{assets_path}/{name}` where `name` is
    /// [`asset_file_name`] of the source resolved against `base_url`, the same name
    /// the downloader writes. Sources that cannot be resolved are named from their raw
    /// value; images without `src` get `{assets_path}/`.
    pub fn rewrite_image_sources(self, base_url: &str, assets_path: &str) -> String {
        let base = Url::parse(base_url).ok();
        let mut html = self.html;
        let images: Vec<_> = html
            .tree
            .root()
            .descendants()
            .filter(|node| matches!(node.value(), Node::Element(el) if el.name() == "img"))
            .map(|node| node.id())
            .collect();

        let src = QualName::new(None, Namespace::from(""), LocalName::from("src"));
        for id in images {
            if let Some(mut node) = html.tree.get_mut(id)
                && let Node::Element(el) = node.value()
            {
                let name = match el.attr("src") {
                    None => String::new(),
                    Some(value) => match base.as_ref().map(|base| base.join(value)) {
                        Some(Ok(resolved)) => asset_file_name(resolved.as_str()),
                        _ => asset_file_name(value),
                    },
                };
                el.attrs
                    .insert(src.clone(), format!("{assets_path}/{name}").into());
            }
        }

        html.html()
    }

    fn resolve_attribute(&self, element: &str, attribute: &str, base_url: &str) -> Vec<String> {
        let base = match Url::parse(base_url) {
            Ok(base) => base,
            Err(e) => {
                debug!(base_url, error = %e, "base URL is not absolute, nothing resolved");
                return Vec::new();
            }
        };

        self.html
            .tree
            .root()
            .descendants()
            .filter_map(|node| match node.value() {
                Node::Element(el) if el.name() == element => el.attr(attribute),
                _ => None,
            })
            .filter_map(|value| match base.join(value) {
                Ok(resolved) => Some(resolved.to_string()),
                Err(e) => {
                    debug!(value, error = %e, "skipping unresolvable {element} {attribute}");
                    None
                }
            })
            .collect()
    }
}

/// Links, images and rewritten markup of one page
#[derive(Debug)]
pub struct ProcessedMarkup {
    /// Resolved anchor targets
    pub links: Vec<String>,
    /// Resolved image sources
    pub images: Vec<String>,
    /// Markup with image sources pointing into the asset directory
    pub rewritten: String,
}

/// Run all three stages over one page body
pub fn process(body: &str, base_url: &str, assets_path: &str) -> ProcessedMarkup {
    let doc = Document::parse(body);
    let links = doc.extract_links(base_url);
    let images = doc.extract_images(base_url);
    let rewritten = doc.rewrite_image_sources(base_url, assets_path);
    ProcessedMarkup {
        links,
        images,
        rewritten,
    }
}
