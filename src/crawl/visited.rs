// src/crawl/visited.rs
// =============================================================================
// The set of canonical URLs that some task has already claimed.
//
// There is exactly one operation that matters: try_claim. It checks
// membership and inserts in a single step, so two tasks racing on the same
// URL can never both win. No separate "contains" query is exposed.
//
// Rust concepts:
// - DashSet: a HashSet split into shards, each behind its own lock.
//   insert() returns false if the value was already present.
// - &self methods on shared state: interior mutability instead of &mut
// =============================================================================

use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct VisitedRegistry {
    claimed: DashSet<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a canonical URL for the calling task.
    ///
    /// Returns `true` exactly once per URL; every later call returns `false`
    /// and leaves the registry untouched.
    pub fn try_claim(&self, canonical_url: String) -> bool {
        self.claimed.insert(canonical_url)
    }

    /// Number of URLs claimed so far.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_claim_once() {
        let registry = VisitedRegistry::new();
        assert!(registry.try_claim("http://h/p".to_string()));
        assert!(!registry.try_claim("http://h/p".to_string()));
        assert!(registry.try_claim("http://h/q".to_string()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_claims_have_a_single_winner() {
        let registry = Arc::new(VisitedRegistry::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        if registry.try_claim(format!("http://h/{}", i)) {
                            winners.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // 100 distinct URLs, each won by exactly one of the 32 threads
        assert_eq!(winners.load(Ordering::SeqCst), 100);
        assert_eq!(registry.len(), 100);
    }
}
