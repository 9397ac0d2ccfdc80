//! Do-exactly-once gate.

use std::sync::atomic::{AtomicBool, Ordering};

/// A gate that concurrent racers can win exactly once.
///
/// Used two ways by the runtime: to deregister an event immediately
/// after its first successful fire, and to stop an interval driver
/// after a single tick for once+interval events.
///
/// # Example
///
/// ```
/// use fuze_event::OnceGate;
///
/// let gate = OnceGate::new();
/// assert!(gate.fire());
/// assert!(!gate.fire());
/// assert!(gate.has_fired());
/// ```
#[derive(Debug, Default)]
pub struct OnceGate {
    fired: AtomicBool,
}

impl OnceGate {
    /// Creates an unfired gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to fire the gate.
    ///
    /// Returns `true` for exactly one caller, `false` for every other,
    /// regardless of how many callers race.
    pub fn fire(&self) -> bool {
        self.fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Returns `true` once some caller has won the gate.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}
