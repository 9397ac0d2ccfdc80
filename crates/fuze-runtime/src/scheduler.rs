//! Background drivers for time-based capabilities.
//!
//! One tokio task per interval-capable event ticks at the fixed period
//! and spawns the payload on each tick, so a slow payload never blocks
//! the ticker. After-only events get a lighter driver: wait out the
//! delay, run once, deregister.
//!
//! Every driver selects on both the loop-wide shutdown token and the
//! capability's own stop/break token, so it can be stopped without
//! deregistering (capability token) or torn down wholesale (loop
//! token).

use fuze_event::{CancelToken, Event, EventContext, Role};
use fuze_registry::TriggerRegistry;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Runs the payload as an independent task, raising the publisher
/// activation signal afterwards when the event carries that role.
pub(crate) fn run_payload(event: &Arc<Event>, cancel: &CancelToken) {
    let event = Arc::clone(event);
    let ctx = EventContext {
        event_id: event.id(),
        trigger: None,
        cancel: cancel.clone(),
    };
    tokio::spawn(async move {
        let output = event.run(&ctx);
        debug!(event = %event.id(), output = %output, "payload finished");
        if let Some(sub) = event.subscriber() {
            if sub.role() == Role::Publisher {
                sub.activate();
            }
        }
    });
}

/// Attaches the interval driver for an interval-capable event.
///
/// The capability's running flag is claimed before spawning; a second
/// attach attempt is refused, so at most one driver ever ticks per
/// capability. An attached After capability acts as a pre-delay gate:
/// the ticker only starts once the delay has elapsed uninterrupted.
pub(crate) fn spawn_interval_driver(
    event: Arc<Event>,
    registry: Arc<Mutex<TriggerRegistry>>,
    shutdown: CancelToken,
) {
    {
        let Some(interval) = event.interval() else {
            return;
        };
        if !interval.try_start() {
            warn!(event = %event.id(), "interval driver already attached");
            return;
        }
    }
    tokio::spawn(async move {
        debug!(event = %event.id(), "interval driver started");
        let spent = drive_interval(&event, &shutdown).await;
        if let Some(interval) = event.interval() {
            interval.set_idle();
        }
        if spent {
            // Once-gated tickers deregister after their single run.
            let _ = registry.lock().remove_events(&[event.id()]);
        }
        debug!(event = %event.id(), "interval driver stopped");
    });
}

/// Ticks until stopped. Returns `true` when a once gate completed the
/// capability and the event should be deregistered.
async fn drive_interval(event: &Arc<Event>, shutdown: &CancelToken) -> bool {
    let Some(interval) = event.interval() else {
        return false;
    };
    if let Some(after) = event.after() {
        if !after.wait(shutdown).await {
            return false;
        }
    }
    let period = interval.period();
    // First tick fires one full period in, not immediately.
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => return false,
            () = interval.stop_token().cancelled() => return false,
            _ = ticker.tick() => {
                match event.once() {
                    Some(gate) => {
                        // A racing trigger call may have spent the gate
                        // already; either way this driver is done.
                        if gate.fire() {
                            run_payload(event, shutdown);
                        }
                        return true;
                    }
                    None => run_payload(event, shutdown),
                }
            }
        }
    }
}

/// Attaches the delayed one-shot driver for an after-only event:
/// wait, run once, deregister.
///
/// Removal mid-delay interrupts the wait through the break token; the
/// payload then never runs and the (already gone) registry entry is
/// left alone by the idempotent removal.
pub(crate) fn spawn_delayed_oneshot(
    event: Arc<Event>,
    registry: Arc<Mutex<TriggerRegistry>>,
    shutdown: CancelToken,
) {
    tokio::spawn(async move {
        let elapsed = match event.after() {
            Some(after) => after.wait(&shutdown).await,
            None => return,
        };
        if elapsed {
            let fire = match event.once() {
                Some(gate) => gate.fire(),
                None => true,
            };
            if fire {
                run_payload(&event, &shutdown);
            }
        }
        let _ = registry.lock().remove_events(&[event.id()]);
    });
}
