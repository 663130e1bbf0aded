//! Teardown flag for in-flight fetches
//!
//! A view hands a clone of its [`Liveness`] to each fetch it starts and
//! calls [`Liveness::tear_down`] when it goes away. Results that resolve
//! afterwards are dropped instead of delivered.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn tear_down(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Await `fetch` and return its output only if the owner is still
    /// alive when it resolves.
    pub async fn deliver_if_alive<F, T>(&self, fetch: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let value = fetch.await;
        if self.is_alive() {
            Some(value)
        } else {
            debug!("Discarding result delivered after teardown");
            None
        }
    }
}
