// src/fetcher/headless.rs
// =============================================================================
// Headless Chrome fetcher.
//
// Some sites build their links with JavaScript, so a plain GET never sees
// them. This fetcher loads each page in headless Chrome and returns the
// rendered HTML instead.
//
// How it works:
// - The browser is launched lazily on the first fetch and then shared by
//   every task (launching Chrome per page would be far too slow)
// - chromiumoxide needs its event handler polled, so that runs on its own
//   tokio task for the lifetime of the browser
// - Each fetch opens a new tab, waits for navigation, checks the status of
//   the main document response, reads the DOM and closes the tab again
// - Chrome happily renders error pages, so a non-2xx status is turned into
//   FetchError::Status here, the same as the HTTP fetcher does
//
// Rust concepts:
// - tokio::sync::OnceCell: async, fallible, one-time initialization
// - StreamExt::next(): pulling events out of the browser handler stream
// =============================================================================

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::OnceCell;
use tracing::{debug, info, trace};

use super::{FetchError, Fetcher};

#[derive(Default)]
pub struct HeadlessChromeFetcher {
    browser: OnceCell<Browser>,
}

impl HeadlessChromeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    async fn browser(&self) -> Result<&Browser, FetchError> {
        self.browser.get_or_try_init(launch_browser).await
    }
}

async fn launch_browser() -> Result<Browser, FetchError> {
    // The builder defaults to headless mode
    let config = BrowserConfig::builder().build().map_err(FetchError::Browser)?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| FetchError::Browser(format!("failed to launch browser: {}", e)))?;

    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                // Chrome regularly sends CDP events chromiumoxide can't decode
                trace!("browser handler error: {}", e);
            }
        }
        debug!("browser handler finished");
    });

    info!("headless browser launched");
    Ok(browser)
}

// Status of the main document response, if Chrome reported one.
// Missing status (e.g. a file:// or about: page) counts as success.
fn check_status(status: Option<i64>) -> Result<(), FetchError> {
    match status {
        Some(status) if !(200..300).contains(&status) => Err(FetchError::Status {
            status: u16::try_from(status).unwrap_or(u16::MAX),
        }),
        _ => Ok(()),
    }
}

async fn render(page: &Page, url: &str) -> Result<String, FetchError> {
    let request = page
        .wait_for_navigation_response()
        .await
        .map_err(|e| FetchError::Browser(format!("navigation to {} failed: {}", url, e)))?;

    let status = request
        .as_ref()
        .and_then(|request| request.response.as_ref())
        .map(|response| response.status);
    check_status(status)?;

    page.content()
        .await
        .map_err(|e| FetchError::Browser(format!("failed to read {}: {}", url, e)))
}

#[async_trait]
impl Fetcher for HeadlessChromeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let browser = self.browser().await?;

        let page = browser
            .new_page(url)
            .await
            .map_err(|e| FetchError::Browser(format!("failed to open {}: {}", url, e)))?;

        // The tab is closed on success and on error
        let rendered = render(&page, url).await;

        if let Err(e) = page.close().await {
            debug!("failed to close tab for {}: {}", url, e);
        }

        Ok(rendered?.into_bytes())
    }
}
