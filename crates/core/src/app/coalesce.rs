//! Intent coalescing policies.
//!
//! Bursty presentation intents (search keystrokes, scroll-driven paging)
//! are collapsed before they reach the core. The contract is latency-only:
//! the eventual invocation reflects the last input of the burst, so the
//! derived view is the same one an uncoalesced run would end on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

/// Trailing-edge coalescer: only the last call within the quiet window
/// executes.
///
/// Each call supersedes any pending one. The returned handle resolves to
/// whether this particular call was the one that ran.
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedule `action` to run after the quiet window, unless a newer call
    /// supersedes it first.
    pub fn call<F>(&self, action: F) -> JoinHandle<bool>
    where
        F: FnOnce() + Send + 'static,
    {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let window = self.window;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if generation.load(Ordering::SeqCst) == token {
                action();
                true
            } else {
                false
            }
        })
    }
}

/// Leading-edge limiter: the first call in a window passes, the rest of the
/// burst is dropped.
pub struct Throttler {
    window: Duration,
    last: Option<Instant>,
}

impl Throttler {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether a call arriving now may proceed.
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
