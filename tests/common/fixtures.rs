//! HTML fixtures and asset payloads

/// Stand-in image payload; only the bytes on disk are compared
pub const IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nweb-fetch-test-image";

/// Page with a relative link, an absolute link, an anchor without `href`,
/// and an image without `src`
pub const ARTICLE_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Article</title>
  </head>
  <body>
    <nav><a href="../index.html">Home</a> <a href="https://example.org/elsewhere">Elsewhere</a></nav>
    <a id="top">no href here</a>
    <article>
      <img src="images/header.png" alt="header">
      <p>Body text <a href="#top">back to top</a></p>
      <img alt="placeholder without a source">
    </article>
  </body>
</html>"##;

/// Page that references two images, one of which the site does not serve
pub const TWO_IMAGE_PAGE: &str = r#"<html><body>
<img src="/media/present.png">
<img src="/media/absent.png">
</body></html>"#;

/// Page without any images or links
pub const PLAIN_PAGE: &str = "<html><body><p>Nothing to see.</p></body></html>";
