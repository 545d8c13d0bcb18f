// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Concurrent, recursive crawling starting from a seed URL
// - Each page is fetched at most once, however many links point to it
// - Configurable depth limit and parallelism
// - Access policy (allowed hosts / allowed URL patterns)
// - Results and errors are delivered through callbacks
//
// Submodules, leaves first:
// - resolver: resolving, canonicalizing and validating URLs
// - policy: which URLs may be visited
// - visited: the "already claimed" set
// - gate: bounds how many tasks work at once
// - callbacks: user event handlers
// - error: what can go wrong in a task
// - engine: the crawler itself
// =============================================================================

mod callbacks;
mod engine;
mod error;
mod gate;
mod policy;
mod resolver;
mod visited;

// Re-export the public crawling API
pub use engine::{CrawlConfig, CrawlResult, CrawlStats, Crawler};
pub use error::CrawlError;
pub use gate::DEFAULT_PARALLELISM;
pub use policy::AccessPolicy;
