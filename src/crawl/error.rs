// src/crawl/error.rs
// =============================================================================
// Errors a single crawl task can run into.
//
// None of these stop the crawl. Each one ends only the task that hit it and
// is handed to the registered error callbacks.
// =============================================================================

use std::fmt;
use thiserror::Error;

use crate::fetcher::FetchError;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// Not an http(s) URL, or no host.
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Rejected by the access policy.
    #[error("Forbidden: {url}")]
    Forbidden { url: String },

    /// Another task already claimed this page.
    #[error("Already visited: {url}")]
    AlreadyVisited { url: String },

    /// The URL string or the fetched document could not be parsed.
    #[error("Parse failure for {url}: {reason}")]
    ParseFailure { url: String, reason: String },

    #[error("Fetch failed for {url}: {source}")]
    FetchFailure {
        url: String,
        #[source]
        source: FetchError,
    },
}

/// Coarse classification of a [`CrawlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidUrl,
    Forbidden,
    AlreadyVisited,
    ParseFailure,
    FetchFailure,
}

impl CrawlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CrawlError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            CrawlError::Forbidden { .. } => ErrorKind::Forbidden,
            CrawlError::AlreadyVisited { .. } => ErrorKind::AlreadyVisited,
            CrawlError::ParseFailure { .. } => ErrorKind::ParseFailure,
            CrawlError::FetchFailure { .. } => ErrorKind::FetchFailure,
        }
    }

    /// The URL of the task that failed.
    pub fn url(&self) -> &str {
        match self {
            CrawlError::InvalidUrl { url }
            | CrawlError::Forbidden { url }
            | CrawlError::AlreadyVisited { url }
            | CrawlError::ParseFailure { url, .. }
            | CrawlError::FetchFailure { url, .. } => url,
        }
    }

    /// True when the task was turned away before fetching, false when
    /// something went wrong while working on it.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidUrl | ErrorKind::Forbidden | ErrorKind::AlreadyVisited
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidUrl => "invalid_url",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::AlreadyVisited => "already_visited",
            ErrorKind::ParseFailure => "parse_failure",
            ErrorKind::FetchFailure => "fetch_failure",
        };
        f.write_str(name)
    }
}
