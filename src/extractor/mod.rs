// src/extractor/mod.rs
// =============================================================================
// Link extractors pull raw hyperlinks out of a fetched document.
//
// They don't resolve or filter anything: relative links come back exactly
// as written, and the crawl engine decides what to do with them.
//
// Submodules:
// - html: <a href> links from HTML documents
// =============================================================================

mod html;

use thiserror::Error;

pub use html::HtmlLinkExtractor;

/// Finds the links in a document, in document order.
pub trait LinkExtractor: Send + Sync {
    fn extract(&self, body: &[u8]) -> Result<Vec<String>, ExtractError>;
}

// Selector errors surface when the extractor is built, not per page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector: {0}")]
    Selector(String),
}
