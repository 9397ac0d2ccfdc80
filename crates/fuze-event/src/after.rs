//! Delayed-start capability.

use crate::CancelToken;
use std::time::Duration;
use tokio::time::Instant;

/// When a delayed start becomes due.
#[derive(Debug, Clone, Copy)]
pub enum Deadline {
    /// An absolute instant.
    At(Instant),
    /// A relative offset, computed from the moment [`After::wait`]
    /// is entered.
    In(Duration),
}

/// After capability: a single delayed start.
///
/// Used to stagger an event's first execution — either as a delayed
/// one-shot, or as a pre-delay gate before an interval driver starts
/// ticking. `wait` blocks until the deadline or until the break token
/// (or the caller's token) cancels.
#[derive(Debug)]
pub struct After {
    deadline: Deadline,
    brk: CancelToken,
}

impl After {
    /// Delayed start at an absolute instant.
    #[must_use]
    pub fn at(instant: Instant) -> Self {
        Self {
            deadline: Deadline::At(instant),
            brk: CancelToken::new(),
        }
    }

    /// Delayed start after a relative offset.
    #[must_use]
    pub fn delayed_by(offset: Duration) -> Self {
        Self {
            deadline: Deadline::In(offset),
            brk: CancelToken::new(),
        }
    }

    /// The configured deadline.
    #[must_use]
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Token that interrupts a pending [`wait`](Self::wait).
    #[must_use]
    pub fn break_token(&self) -> &CancelToken {
        &self.brk
    }

    /// Interrupts a pending wait. Latched.
    pub fn interrupt(&self) {
        self.brk.cancel();
    }

    /// Blocks until the computed deadline elapses.
    ///
    /// Returns `true` when the delay ran to completion, `false` when
    /// the break token or the caller's token cancelled first.
    pub async fn wait(&self, ctx: &CancelToken) -> bool {
        let due = match self.deadline {
            Deadline::At(instant) => instant,
            Deadline::In(offset) => Instant::now() + offset,
        };
        tokio::select! {
            () = tokio::time::sleep_until(due) => true,
            () = self.brk.cancelled() => false,
            () = ctx.cancelled() => false,
        }
    }
}
