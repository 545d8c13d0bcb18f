// src/extractor/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken markup still parses
//
// The body arrives as raw bytes. Anything that isn't valid UTF-8 (an image,
// a PDF) is decoded lossily, which simply yields no links.
// =============================================================================

use scraper::{Html, Selector};

use super::{ExtractError, LinkExtractor};

const LINK_SELECTOR: &str = "a[href]";

// The selector is parsed once and shared by every page
#[derive(Debug, Clone)]
pub struct HtmlLinkExtractor {
    links: Selector,
}

impl HtmlLinkExtractor {
    pub fn new() -> Result<Self, ExtractError> {
        let links = Selector::parse(LINK_SELECTOR)
            .map_err(|e| ExtractError::Selector(format!("{}: {:?}", LINK_SELECTOR, e)))?;
        Ok(Self { links })
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    // Returns every <a href="..."> value, unmodified, in document order
    //
    // Example:
    //   body = "<a href='/docs'>Docs</a><a href='https://x.org'>X</a>"
    //   result = ["/docs", "https://x.org"]
    fn extract(&self, body: &[u8]) -> Result<Vec<String>, ExtractError> {
        let html = String::from_utf8_lossy(body);
        let document = Html::parse_document(&html);

        let links = document
            .select(&self.links)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect();

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<String> {
        HtmlLinkExtractor::new()
            .unwrap()
            .extract(html.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_extract_keeps_links_as_written() {
        let links = extract(
            r#"
            <a href="https://www.rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
            <a href="mailto:test@example.com">Email</a>
        "#,
        );
        assert_eq!(
            links,
            vec![
                "https://www.rust-lang.org",
                "/docs",
                "../about",
                "mailto:test@example.com"
            ]
        );
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let links = extract(r#"<a name="top">Top</a><a href="">Empty</a>"#);
        assert_eq!(links, vec![""]);
    }

    #[test]
    fn test_document_order_across_nesting() {
        let links = extract(
            r#"<div><a href="1"></a><p><a href="2"></a></p></div><footer><a href="3"></a></footer>"#,
        );
        assert_eq!(links, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_binary_body_yields_no_links() {
        let png_header = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0xfe];
        let links = HtmlLinkExtractor::new()
            .unwrap()
            .extract(&png_header)
            .unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_one_extractor_serves_many_pages() {
        let extractor = HtmlLinkExtractor::new().unwrap();
        let first = extractor.extract(br#"<a href="/a">a</a>"#).unwrap();
        let second = extractor.extract(br#"<a href="/b">b</a><a href="/c">c</a>"#).unwrap();
        assert_eq!(first, vec!["/a"]);
        assert_eq!(second, vec!["/b", "/c"]);
    }
}
