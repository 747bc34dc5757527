//! HTML parsing for link discovery
//!
//! Extracts candidate URLs from a fetched page: the `href` of every anchor
//! and `<link>` element plus the `src` of every image and script. Values are
//! returned exactly as they appear in the markup — resolution and scoping are
//! the frontier's job, not the parser's.

use crate::SweepError;
use scraper::{Html, Selector};

/// Extracts candidate URL strings from an HTML document, in document order
///
/// The two selector passes mirror the attributes that carry URLs: `href` on
/// anchors and stylesheet/canonical links, `src` on images and scripts.
pub fn extract_candidates(html: &str, page_url: &str) -> Result<Vec<String>, SweepError> {
    let document = Html::parse_document(html);

    let href_selector = selector("a[href], link[href]", page_url)?;
    let src_selector = selector("img[src], script[src]", page_url)?;

    let mut candidates = Vec::new();

    for element in document.select(&href_selector) {
        if let Some(href) = element.value().attr("href") {
            candidates.push(href.to_string());
        }
    }

    for element in document.select(&src_selector) {
        if let Some(src) = element.value().attr("src") {
            candidates.push(src.to_string());
        }
    }

    Ok(candidates)
}

fn selector(css: &str, page_url: &str) -> Result<Selector, SweepError> {
    Selector::parse(css).map_err(|e| SweepError::HtmlParse {
        url: page_url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(html: &str) -> Vec<String> {
        extract_candidates(html, "https://test.local/").unwrap()
    }

    #[test]
    fn test_extracts_anchor_hrefs() {
        let html = r#"<html><body><a href="/a">A</a><a href="https://test.local/b">B</a></body></html>"#;
        assert_eq!(candidates(html), vec!["/a", "https://test.local/b"]);
    }

    #[test]
    fn test_extracts_link_hrefs() {
        let html = r#"<html><head><link rel="stylesheet" href="/style.css"></head><body></body></html>"#;
        assert_eq!(candidates(html), vec!["/style.css"]);
    }

    #[test]
    fn test_extracts_img_and_script_srcs() {
        let html = r#"<html><body><img src="/logo.png"><script src="/app.js"></script></body></html>"#;
        assert_eq!(candidates(html), vec!["/logo.png", "/app.js"]);
    }

    #[test]
    fn test_values_are_not_resolved() {
        // Raw attribute values pass through untouched; the frontier decides
        // what they mean.
        let html = r##"<html><body><a href="relative.html">R</a><a href="#top">T</a></body></html>"##;
        assert_eq!(candidates(html), vec!["relative.html", "#top"]);
    }

    #[test]
    fn test_href_pass_precedes_src_pass() {
        let html = r#"<html><body><img src="/img.png"><a href="/page">P</a></body></html>"#;
        assert_eq!(candidates(html), vec!["/page", "/img.png"]);
    }

    #[test]
    fn test_elements_without_the_attribute_are_skipped() {
        let html = r#"<html><body><a name="anchor">no href</a><script>inline()</script></body></html>"#;
        assert!(candidates(html).is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert!(candidates("").is_empty());
    }

    #[test]
    fn test_malformed_markup_still_yields_candidates() {
        let html = r#"<body><a href="/a">unclosed<img src="/b.png"#;
        assert_eq!(candidates(html), vec!["/a", "/b.png"]);
    }
}
