//! Connection limiting middleware
//!
//! Caps the number of concurrently served connections.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Hands out one permit per live connection
#[derive(Clone)]
pub struct ConnectionLimiter {
    permits: Arc<Semaphore>,
    max_connections: usize,
}

impl ConnectionLimiter {
    pub fn new(max_connections: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_connections)),
            max_connections,
        }
    }

    /// Returns a permit held for the connection's lifetime, or `None` at capacity.
    pub fn try_acquire(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.permits).try_acquire_owned().ok()
    }

    pub fn active(&self) -> usize {
        self.max_connections - self.permits.available_permits()
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }
}
