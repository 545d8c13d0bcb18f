// src/crawl/gate.rs
// =============================================================================
// Admission gate limiting how many crawl tasks do work at the same time.
//
// Spawning a task is cheap and unbounded; the gate is what keeps the number
// of simultaneous fetches at or below the configured capacity.
//
// Rust concepts:
// - tokio::sync::Semaphore: a counter of available permits; acquiring waits
//   asynchronously when none are left
// - RAII: the permit gives its slot back when it is dropped, on every exit
//   path of the task (early return, error, normal completion)
// =============================================================================

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Default number of tasks allowed to work concurrently.
pub const DEFAULT_PARALLELISM: usize = 5;

#[derive(Debug, Clone)]
pub struct ParallelismGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held slot in the gate. Dropping it releases the slot.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ParallelismGate {
    /// Creates a gate with `capacity` slots (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Waits for a free slot.
    ///
    /// Fails only if the semaphore was closed, which this crate never does.
    pub async fn acquire(&self) -> Result<GatePermit, AcquireError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        Ok(GatePermit { _permit: permit })
    }

    #[cfg(test)]
    fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for ParallelismGate {
    fn default() -> Self {
        Self::new(DEFAULT_PARALLELISM)
    }
}
