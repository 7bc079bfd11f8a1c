//! Cancellation and staleness tracking for view models.
//!
//! A view owns one [`ViewScope`]. Closing the scope (explicitly or by
//! dropping the view) abandons every in-flight load, and each load takes a
//! [`Ticket`] so that a response superseded by a newer load is discarded
//! instead of overwriting fresher state.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Generation stamp for one load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct ViewScope {
    closed: watch::Sender<bool>,
    generation: AtomicU64,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            closed,
            generation: AtomicU64::new(0),
        }
    }

    /// Abandon all in-flight work. Idempotent.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Start a new load, superseding any earlier one
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Ticket of the latest load, without starting a new one
    pub fn current(&self) -> Ticket {
        Ticket(self.generation.load(Ordering::SeqCst))
    }

    /// Whether results for `ticket` may still be written
    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.is_closed() && self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Run `fut` unless the scope closes first.
    ///
    /// Returns `None` when the scope was closed before or during the call.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let mut closed = self.closed.subscribe();
        if *closed.borrow() {
            return None;
        }

        tokio::select! {
            output = fut => Some(output),
            _ = closed.wait_for(|c| *c) => None,
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.close();
    }
}
