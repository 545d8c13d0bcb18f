// src/fetcher/mod.rs
// =============================================================================
// Fetchers download a page and hand back its raw bytes.
//
// The crawl engine only knows the Fetcher trait. Two implementations:
// - http: plain GET with reqwest
// - headless: load the page in headless Chrome and return the rendered DOM
//
// Which one is used is decided once, when the crawler is built.
//
// Rust concepts:
// - Traits as interfaces: Arc<dyn Fetcher> can hold either implementation
// - async-trait: async fn in a trait that is used as a trait object
// =============================================================================

mod headless;
mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use headless::HeadlessChromeFetcher;
pub use http::{HttpFetcher, DEFAULT_TIMEOUT};

/// Downloads the body behind a URL.
///
/// Implementations must treat non-2xx responses and connection problems as
/// errors and must not retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("browser error: {0}")]
    Browser(String),
}
