//! Confirmation bus: correlation-keyed waiters with cancellation.
//!
//! The surrounding tool pipeline asks the user to approve an operation and
//! waits for the answer on this bus. A waiter registers a oneshot listener
//! under its correlation ID and races it against a cancel token. Whichever
//! side wins unsubscribes the listener; a response arriving for an already
//! cancelled waiter is dropped on the floor.
//!
//! Cancellation is the only failure kind observable outside the engine, so it
//! gets a typed error rather than an `anyhow` blob.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::{Mutex, Notify, oneshot};
use tracing::trace;

/// Outcome reported by the confirmation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Approved,
    Denied,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfirmError {
    /// The cancel token fired before a response arrived.
    #[error("operation cancelled")]
    Cancelled,
    /// The responding side dropped its sender without answering.
    #[error("confirmation channel closed")]
    Closed,
}

struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Fires cancellation for every token cloned from it.
#[derive(Clone)]
pub struct CancelSource {
    inner: Arc<CancelInner>,
}

/// Cloneable cancellation handle handed to waiters.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

impl CancelSource {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancelInner {
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the source cancels. Never resolves otherwise.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            // Register interest before re-checking to avoid a lost wakeup.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Registry of in-flight confirmation waiters keyed by correlation ID.
pub struct ConfirmationBus {
    waiters: Mutex<HashMap<u64, oneshot::Sender<ConfirmOutcome>>>,
}

impl ConfirmationBus {
    pub fn new() -> Self {
        Self {
            waiters: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for the outcome of `correlation_id`, racing the cancel token.
    pub async fn await_outcome(
        &self,
        correlation_id: u64,
        cancel: CancelToken,
    ) -> Result<ConfirmOutcome, ConfirmError> {
        let (tx, rx) = oneshot::channel();
        self.waiters.lock().await.insert(correlation_id, tx);
        trace!(target: "events.confirm", correlation_id, "waiter_registered");
        tokio::select! {
            outcome = rx => {
                // Sender was removed by `resolve` before sending; nothing to clean up
                // on success. A dropped sender without a send means the responder died.
                match outcome {
                    Ok(o) => {
                        trace!(target: "events.confirm", correlation_id, outcome = ?o, "waiter_resolved");
                        Ok(o)
                    }
                    Err(_) => Err(ConfirmError::Closed),
                }
            }
            _ = cancel.cancelled() => {
                self.waiters.lock().await.remove(&correlation_id);
                trace!(target: "events.confirm", correlation_id, "waiter_cancelled");
                Err(ConfirmError::Cancelled)
            }
        }
    }

    /// Deliver an outcome. Returns false when no waiter is registered (late
    /// response for a cancelled or already-resolved correlation ID).
    pub async fn resolve(&self, correlation_id: u64, outcome: ConfirmOutcome) -> bool {
        match self.waiters.lock().await.remove(&correlation_id) {
            Some(tx) => tx.send(outcome).is_ok(),
            None => {
                trace!(target: "events.confirm", correlation_id, "late_response_dropped");
                false
            }
        }
    }

    pub async fn pending(&self) -> usize {
        self.waiters.lock().await.len()
    }
}

impl Default for ConfirmationBus {
    fn default() -> Self {
        Self::new()
    }
}
