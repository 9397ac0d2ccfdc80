//! Recurring interval capability.
//!
//! An interval-capable event is driven by one background scheduler
//! task that ticks at the fixed period and spawns the payload on each
//! tick. The capability itself only holds the period, a running flag,
//! and a stop token — the driver lives in `fuze-runtime`.

use crate::CancelToken;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Interval capability: Idle → Running → Idle.
///
/// The running flag is claimed with a compare-and-swap so two drivers
/// can never attach to the same capability simultaneously. Cancelling
/// the stop token stops an active driver without deregistering the
/// event.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    running: AtomicBool,
    stop: CancelToken,
}

impl Interval {
    /// Creates an idle interval with the given tick period.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: AtomicBool::new(false),
            stop: CancelToken::new(),
        }
    }

    /// Fixed tick period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns `true` while a driver is attached.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Claims the capability for a driver.
    ///
    /// Returns `true` for exactly one claimant while idle; a second
    /// driver attempting to attach gets `false` and must not start.
    pub fn try_start(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Marks the capability idle again. Called by the driver on exit.
    pub fn set_idle(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Token a driver selects on to stop without deregistering.
    #[must_use]
    pub fn stop_token(&self) -> &CancelToken {
        &self.stop
    }

    /// Stops the active driver, if any. Latched: a halted interval is
    /// not restartable.
    pub fn halt(&self) {
        self.stop.cancel();
    }
}
