// src/crawl/engine.rs
// =============================================================================
// The crawl engine: recursive, concurrent, depth-bounded traversal.
//
// How it works:
// 1. crawl() spawns one task for the seed URL at depth 1
// 2. Every task waits for a slot in the parallelism gate, then:
//    parse -> depth check -> validity -> access policy -> claim -> fetch
//    -> visit callbacks -> extract links -> visited callbacks
// 3. For every link that resolves, a child task is spawned at depth + 1.
//    The parent does not wait for its children.
// 4. crawl() returns once every task ever spawned has finished
//
// Anything that goes wrong ends only that one task and is reported to the
// error callbacks; the rest of the crawl carries on.
//
// Rust concepts:
// - Arc<CrawlRun>: state shared by all tasks of one crawl
// - TaskTracker: counts spawned tasks so we can wait for all of them
// - BoxFuture: a task spawns more tasks of the same kind, so its future
//   type is boxed to keep it finite
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};
use url::Url;

use super::callbacks::CallbackRegistry;
use super::error::CrawlError;
use super::gate::{ParallelismGate, DEFAULT_PARALLELISM};
use super::policy::AccessPolicy;
use super::resolver::{canonicalize, is_valid, resolve};
use super::visited::VisitedRegistry;
use crate::extractor::LinkExtractor;
use crate::fetcher::Fetcher;

/// One unit of crawl work.
#[derive(Debug, Clone)]
struct CrawlTask {
    url: String,
    depth: usize,
}

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// The URL that was fetched, query and fragment included.
    pub url: Url,
    /// Depth of the task that fetched it (the seed is depth 1).
    pub depth: usize,
    pub body: Vec<u8>,
    /// Links exactly as found in the body, not yet resolved.
    pub links: Vec<String>,
}

/// Everything the crawler needs to know before it starts.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seed: String,
    /// Deepest level that is still fetched. 1 = only the seed.
    pub max_depth: usize,
    pub parallelism: usize,
    pub policy: AccessPolicy,
}

impl CrawlConfig {
    pub fn new(seed: impl Into<String>, max_depth: usize) -> Self {
        Self {
            seed: seed.into(),
            max_depth,
            parallelism: DEFAULT_PARALLELISM,
            policy: AccessPolicy::allow_all(),
        }
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Totals for one crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Pages fetched and delivered to the visited callbacks.
    pub visited: usize,
    /// Tasks turned away: invalid URL, forbidden, already visited.
    pub rejected: usize,
    /// Tasks that failed to parse, fetch or extract.
    pub failed: usize,
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    callbacks: CallbackRegistry,
}

impl Crawler {
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Self {
        Self {
            config,
            fetcher,
            extractor,
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Called with the raw body of every fetched page, before link extraction.
    pub fn on_visit<F>(&mut self, f: F)
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        self.callbacks.on_visit(f);
    }

    /// Called once for every page that was fetched and parsed.
    pub fn on_visited<F>(&mut self, f: F)
    where
        F: Fn(&CrawlResult) + Send + Sync + 'static,
    {
        self.callbacks.on_visited(f);
    }

    /// Called for every task that was rejected or failed.
    pub fn on_error<F>(&mut self, f: F)
    where
        F: Fn(&CrawlError) + Send + Sync + 'static,
    {
        self.callbacks.on_error(f);
    }

    /// Crawls from the seed and returns when the whole traversal is done.
    ///
    /// Errors never surface here; they go to the error callbacks.
    pub async fn crawl(&self) -> CrawlStats {
        let run = self.start_run();
        info!(
            seed = %self.config.seed,
            max_depth = self.config.max_depth,
            parallelism = run.gate.capacity(),
            "starting crawl"
        );

        run.spawn(CrawlTask {
            url: self.config.seed.clone(),
            depth: 1,
        });

        // Closing only means "wait() may finish once empty";
        // running tasks can still spawn children
        run.tracker.close();
        run.tracker.wait().await;

        let stats = run.stats();
        info!(
            visited = stats.visited,
            rejected = stats.rejected,
            failed = stats.failed,
            claimed = run.visited.len(),
            "crawl finished"
        );
        stats
    }

    // Fresh per-crawl state: nothing claimed, gate fully open
    fn start_run(&self) -> Arc<CrawlRun> {
        Arc::new(CrawlRun {
            max_depth: self.config.max_depth,
            policy: self.config.policy.clone(),
            fetcher: Arc::clone(&self.fetcher),
            extractor: Arc::clone(&self.extractor),
            callbacks: self.callbacks.clone(),
            visited: VisitedRegistry::new(),
            gate: ParallelismGate::new(self.config.parallelism),
            tracker: TaskTracker::new(),
            visited_pages: AtomicUsize::new(0),
            rejected: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        })
    }
}

// State shared by every task of a single crawl() call
struct CrawlRun {
    max_depth: usize,
    policy: AccessPolicy,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    callbacks: CallbackRegistry,
    visited: VisitedRegistry,
    gate: ParallelismGate,
    tracker: TaskTracker,
    visited_pages: AtomicUsize,
    rejected: AtomicUsize,
    failed: AtomicUsize,
}

impl CrawlRun {
    fn spawn(self: &Arc<Self>, task: CrawlTask) {
        debug!(url = %task.url, depth = task.depth, "spawning task");
        self.tracker.spawn(Arc::clone(self).run_task(task));
    }

    fn run_task(self: Arc<Self>, task: CrawlTask) -> BoxFuture<'static, ()> {
        async move {
            // Held until the end of this block, children included
            let _permit = match self.gate.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!(url = %task.url, "parallelism gate closed: {}", e);
                    return;
                }
            };

            match self.visit(&task).await {
                Ok(Some(result)) => {
                    self.visited_pages.fetch_add(1, Ordering::Relaxed);
                    self.callbacks.emit_visited(&result);

                    for link in &result.links {
                        if let Some(next) = resolve(&result.url, link) {
                            self.spawn(CrawlTask {
                                url: next,
                                depth: task.depth + 1,
                            });
                        }
                    }
                }
                // Past the depth limit: the normal end of a branch
                Ok(None) => {}
                Err(err) => self.report(err),
            }
        }
        .boxed()
    }

    async fn visit(&self, task: &CrawlTask) -> Result<Option<CrawlResult>, CrawlError> {
        let url = Url::parse(&task.url).map_err(|e| CrawlError::ParseFailure {
            url: task.url.clone(),
            reason: e.to_string(),
        })?;

        if task.depth > self.max_depth {
            return Ok(None);
        }

        if !is_valid(&url) {
            return Err(CrawlError::InvalidUrl {
                url: task.url.clone(),
            });
        }

        // Policy before claim: a forbidden URL must never take a registry slot
        if !self.policy.is_allowed(&url) {
            return Err(CrawlError::Forbidden {
                url: task.url.clone(),
            });
        }

        if !self.visited.try_claim(canonicalize(&url)) {
            return Err(CrawlError::AlreadyVisited {
                url: task.url.clone(),
            });
        }

        let body = self
            .fetcher
            .fetch(url.as_str())
            .await
            .map_err(|source| CrawlError::FetchFailure {
                url: task.url.clone(),
                source,
            })?;

        self.callbacks.emit_visit(&body);

        let links = self
            .extractor
            .extract(&body)
            .map_err(|e| CrawlError::ParseFailure {
                url: task.url.clone(),
                reason: e.to_string(),
            })?;

        info!(url = %url, depth = task.depth, links = links.len(), "visited");

        Ok(Some(CrawlResult {
            url,
            depth: task.depth,
            body,
            links,
        }))
    }

    fn report(&self, err: CrawlError) {
        if err.is_rejection() {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            debug!(kind = %err.kind(), "{}", err);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
            warn!(kind = %err.kind(), "{}", err);
        }
        self.callbacks.emit_error(&err);
    }

    fn stats(&self) -> CrawlStats {
        CrawlStats {
            visited: self.visited_pages.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
