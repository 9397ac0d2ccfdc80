//! Cooperative cancellation token.
//!
//! Every Fuze operation takes the caller's [`CancelToken`], and every
//! spawned background loop is wired to at least one token at spawn
//! time. Cancellation is cooperative: a blocked task observes it at
//! its next `select!` checkpoint, entry points check `is_cancelled()`
//! and fail fast.
//!
//! The token is a latched flag plus a broadcast wakeup: `cancel()` is
//! idempotent, clones share state, and [`cancelled`](CancelToken::cancelled)
//! resolves immediately once the flag is set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// A clonable, latched cancellation token.
///
/// # Example
///
/// ```
/// use fuze_event::CancelToken;
///
/// let token = CancelToken::new();
/// let observer = token.clone();
/// assert!(!observer.is_cancelled());
///
/// token.cancel();
/// assert!(observer.is_cancelled());
/// token.cancel(); // idempotent
/// ```
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    tx: broadcast::Sender<()>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                tx,
            }),
        }
    }

    /// Latches the token. Idempotent; wakes every pending waiter.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            // No receivers is fine — future waiters read the flag.
            let _ = self.inner.tx.send(());
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Waits until the token is cancelled.
    ///
    /// Resolves immediately if already cancelled. Intended for use as
    /// a `tokio::select!` branch in driver loops.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        let mut rx = self.inner.tx.subscribe();
        // Re-check after subscribing: cancel() may have sent before the
        // subscription existed.
        if self.is_cancelled() {
            return;
        }
        // Ok(()) on the wakeup; RecvError cannot starve us because the
        // sender lives in `inner` and a single message never lags.
        let _ = rx.recv().await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
