// src/crawl/callbacks.rs
// =============================================================================
// Event handlers registered by the user of the crawler.
//
// Three events:
// - visit:   raw response body, right after a successful fetch
// - visited: the finished CrawlResult (body + extracted links)
// - error:   any CrawlError that ended a task
//
// Every handler registered for an event is called, synchronously, in the
// order it was registered.
//
// Rust concepts:
// - Trait objects: Arc<dyn Fn(..) + Send + Sync> stores closures of
//   different concrete types in one Vec
// - Send + Sync: handlers are called from many tokio worker threads
// =============================================================================

use std::sync::Arc;

use super::engine::CrawlResult;
use super::error::CrawlError;

pub type VisitCallback = Arc<dyn Fn(&[u8]) + Send + Sync>;
pub type VisitedCallback = Arc<dyn Fn(&CrawlResult) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&CrawlError) + Send + Sync>;

// Cloning copies the lists of Arc handles, not the closures themselves
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    visit: Vec<VisitCallback>,
    visited: Vec<VisitedCallback>,
    error: Vec<ErrorCallback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_visit<F>(&mut self, f: F)
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        self.visit.push(Arc::new(f));
    }

    pub fn on_visited<F>(&mut self, f: F)
    where
        F: Fn(&CrawlResult) + Send + Sync + 'static,
    {
        self.visited.push(Arc::new(f));
    }

    pub fn on_error<F>(&mut self, f: F)
    where
        F: Fn(&CrawlError) + Send + Sync + 'static,
    {
        self.error.push(Arc::new(f));
    }

    pub fn emit_visit(&self, body: &[u8]) {
        for f in &self.visit {
            f(body);
        }
    }

    pub fn emit_visited(&self, result: &CrawlResult) {
        for f in &self.visited {
            f(result);
        }
    }

    pub fn emit_error(&self, err: &CrawlError) {
        for f in &self.error {
            f(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_handlers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut callbacks = CallbackRegistry::new();

        for name in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            callbacks.on_error(move |err| {
                log.lock().unwrap().push(format!("{}: {}", name, err.url()));
            });
        }

        callbacks.emit_error(&CrawlError::AlreadyVisited {
            url: "http://h/p".to_string(),
        });

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first: http://h/p", "second: http://h/p", "third: http://h/p"]
        );
    }

    #[test]
    fn test_events_only_reach_their_own_handlers() {
        let visits = Arc::new(Mutex::new(Vec::new()));
        let mut callbacks = CallbackRegistry::new();
        {
            let visits = Arc::clone(&visits);
            callbacks.on_visit(move |body| visits.lock().unwrap().push(body.len()));
        }
        callbacks.on_error(|_| panic!("no error was emitted"));

        callbacks.emit_visit(b"hello");
        callbacks.emit_visit(b"");

        assert_eq!(*visits.lock().unwrap(), vec![5, 0]);
    }
}
