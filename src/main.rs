// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging and parse command-line arguments
// 2. Build the crawler: access policy, fetcher, link extractor, callbacks
// 3. Run the crawl and print a summary
// 4. Exit with proper code (0 = success, 1 = some pages failed, 2 = error)
//
// Rust concepts used:
// - async/await: the crawler fetches many pages concurrently
// - Arc<dyn Trait>: pick a fetcher implementation at runtime
// - Closures: callbacks that react to crawl events
// =============================================================================

mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - the crawl engine
mod extractor; // src/extractor/ - finding links in fetched pages
mod fetcher; // src/fetcher/ - downloading pages (HTTP or headless Chrome)
mod storage; // src/storage.rs - saving pages to disk

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use crawl::{AccessPolicy, CrawlConfig, CrawlError, CrawlStats, Crawler};
use extractor::HtmlLinkExtractor;
use fetcher::{Fetcher, HeadlessChromeFetcher, HttpFetcher};
use storage::FileStorage;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so that --json output on stdout stays clean.
// Verbosity is controlled with RUST_LOG (e.g. RUST_LOG=site_walker=debug).
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = crawl finished, nothing failed
//   Ok(1) = crawl finished, some pages could not be fetched or parsed
//   Err = bad configuration or setup failure
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let policy = build_policy(&cli)?;

    let fetcher: Arc<dyn Fetcher> = if cli.headless_chrome {
        Arc::new(HeadlessChromeFetcher::new())
    } else {
        Arc::new(
            HttpFetcher::new(Duration::from_secs(cli.timeout_secs))
                .context("Failed to build HTTP client")?,
        )
    };

    let config = CrawlConfig::new(cli.site.clone(), cli.depth)
        .with_parallelism(cli.parallelism)
        .with_policy(policy);

    let extractor = HtmlLinkExtractor::new().context("Failed to build link extractor")?;
    let mut crawler = Crawler::new(config, fetcher, Arc::new(extractor));

    crawler.on_visit(|body| debug!(bytes = body.len(), "body received"));

    let storage = cli.output_dir.clone().map(FileStorage::new);
    crawler.on_visited(move |result| {
        info!(url = %result.url, depth = result.depth, bytes = result.body.len(), "page");
        if let Some(storage) = &storage {
            match storage.save(result) {
                Ok(path) => info!(path = %path.display(), "saved"),
                Err(e) => warn!(url = %result.url, "could not save page: {:#}", e),
            }
        }
    });
    crawler.on_error(log_crawl_error);

    if !cli.json {
        println!("🔍 Crawling: {}", cli.site);
        println!("📊 Max depth: {}, parallelism: {}", cli.depth, cli.parallelism);
        if let Some(dir) = &cli.output_dir {
            println!("💾 Saving pages to: {}", dir.display());
        }
        println!();
    }

    let stats = crawler.crawl().await;

    print_stats(&stats, cli.json)?;

    if stats.failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Turns the --allowed-hosts / --allowed-url-pattern flags into an AccessPolicy.
// An invalid regex is a configuration error, so we fail before crawling.
fn build_policy(cli: &Cli) -> Result<AccessPolicy> {
    let mut policy = AccessPolicy::allow_all();
    policy.add_allowed_hosts(cli.allowed_hosts.iter().map(|h| h.trim().to_string()));

    for pattern in &cli.allowed_url_patterns {
        policy
            .add_allowed_url_pattern(pattern)
            .with_context(|| format!("Invalid --allowed-url-pattern '{}'", pattern))?;
    }

    Ok(policy)
}

fn log_crawl_error(err: &CrawlError) {
    // Already-visited is routine on any site with more than one page
    if err.is_rejection() {
        debug!(kind = %err.kind(), url = err.url(), "skipped");
    } else {
        warn!(kind = %err.kind(), url = err.url(), "{}", err);
    }
}

fn print_stats(stats: &CrawlStats, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
    } else {
        println!();
        println!("📊 Summary:");
        println!("   ✅ Visited: {}", stats.visited);
        println!("   🚫 Skipped: {}", stats.rejected);
        println!("   ❌ Failed: {}", stats.failed);
    }
    Ok(())
}
