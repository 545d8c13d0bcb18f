// src/fetcher/http.rs
// =============================================================================
// Plain HTTP fetcher.
//
// How it works:
// - One reqwest Client is built up front and reused for every request
//   (connection pooling)
// - Each fetch is a single GET; the body is returned as raw bytes
// - Any non-2xx status is an error, and nothing is retried
//
// Rust concepts:
// - Result<T, E> with the ? operator: reqwest errors convert into FetchError
//   automatically thanks to #[from]
// - async/await: the request runs without blocking a thread
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{FetchError, Fetcher};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds a fetcher whose requests give up after `timeout`
    //
    // Fails only if the TLS backend can't be initialized
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_body_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<a href=\"/next\">next</a>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(DEFAULT_TIMEOUT).unwrap();
        let body = fetcher.fetch(&format!("{}/page", server.url())).await.unwrap();

        assert_eq!(body, b"<a href=\"/next\">next</a>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not here")
            .expect(1)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(DEFAULT_TIMEOUT).unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404 }));
        // Exactly one request: failures are never retried
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_failure_is_an_error() {
        // Port 9 (discard) on localhost is essentially never listening
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
