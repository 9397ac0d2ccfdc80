//! The orchestration hub.
//!
//! One [`EventLoop`] owns the trigger registry behind a coarse lock
//! and brokers every operation: register, trigger, subscribe, verb
//! and trigger toggles, removals, and read accessors for transports.
//!
//! ```text
//!            register ──► TriggerRegistry ◄── remove_*
//!                              │
//!  trigger(name) ──► claim batch (once gates fired in place)
//!                              │
//!                    BEFORE_TRIGGER (sync)
//!                              │
//!                    spawn batch, desc priority ──► TriggerHandle
//!                              │
//!                    AFTER_TRIGGER (sync)
//! ```
//!
//! The lock is held only across registry mutation and snapshotting,
//! never across an `.await`. Background drivers (interval tickers,
//! delayed one-shots, barrier loops) are spawned onto the ambient
//! tokio runtime and all select on the loop-wide shutdown token, so
//! [`shutdown`](EventLoop::shutdown) bounds every task the loop ever
//! started.

use crate::error::LoopError;
use crate::handle::TriggerHandle;
use crate::{scheduler, subscribe};
use fuze_event::{link, CancelToken, Event, EventContext, EventError, EventSummary, Role};
use fuze_registry::TriggerRegistry;
use fuze_types::{EventId, TriggerName};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Globally toggleable loop verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopFunc {
    /// [`EventLoop::register`].
    Register,
    /// [`EventLoop::trigger`].
    Trigger,
    /// [`EventLoop::subscribe`].
    Subscribe,
}

impl fmt::Display for LoopFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => f.write_str("register"),
            Self::Trigger => f.write_str("trigger"),
            Self::Subscribe => f.write_str("subscribe"),
        }
    }
}

/// In-process event orchestration engine.
///
/// All methods are synchronous and non-blocking; they must be called
/// from within a tokio runtime because launching a batch and
/// attaching background drivers spawn tasks.
#[derive(Debug)]
pub struct EventLoop {
    registry: Arc<Mutex<TriggerRegistry>>,
    disabled_funcs: Mutex<HashSet<LoopFunc>>,
    shutdown: CancelToken,
}

impl EventLoop {
    /// Creates an empty loop.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(TriggerRegistry::new())),
            disabled_funcs: Mutex::new(HashSet::new()),
            shutdown: CancelToken::new(),
        }
    }

    /// Registers a batch of built events.
    ///
    /// Accepts builder results directly so one malformed event cannot
    /// abort its siblings: every valid event in the batch is inserted
    /// and its background drivers attached, failures accumulate and
    /// come back as [`LoopError::Batch`] (or the bare error for a
    /// single-item batch).
    pub fn register<I>(&self, ctx: &CancelToken, events: I) -> Result<(), LoopError>
    where
        I: IntoIterator<Item = Result<Event, EventError>>,
    {
        self.check_entry(ctx, LoopFunc::Register)?;
        let mut total = 0usize;
        let mut failures = Vec::new();
        for item in events {
            total += 1;
            let event = match item.and_then(validate_shape) {
                Ok(ev) => Arc::new(ev),
                Err(err) => {
                    failures.push(LoopError::from(err));
                    continue;
                }
            };
            if !self.registry.lock().add_event(Arc::clone(&event)) {
                continue;
            }
            self.spawn_background(&event);
            info!(event = %event.id(), trigger = ?event.trigger_name(), "event registered");
        }
        batch_result(total, failures)
    }

    /// Fires a trigger by name.
    ///
    /// Runs `BEFORE_TRIGGER` system events synchronously, launches
    /// every attached event as its own task in descending-priority
    /// order, runs `AFTER_TRIGGER` synchronously, and returns the
    /// launched batch as a [`TriggerHandle`]. Launch order is
    /// guaranteed; completion order is not.
    ///
    /// Once-capable matches are deregistered the moment their gate
    /// fires — the gate is spent inside the registry critical section,
    /// so racing calls observe exactly one launch. An unknown name
    /// launches nothing and still succeeds.
    pub fn trigger(&self, ctx: &CancelToken, name: &TriggerName) -> Result<TriggerHandle, LoopError> {
        self.check_entry(ctx, LoopFunc::Trigger)?;
        let batch = {
            let mut reg = self.registry.lock();
            if !reg.is_trigger_enabled(name) {
                return Err(LoopError::TriggerDisabled(name.clone()));
            }
            claim_batch(&mut reg, name)
        };
        if batch.is_empty() {
            debug!(trigger = %name, "no events attached");
            return Ok(TriggerHandle::empty());
        }

        // System brackets run for user triggers only; firing a
        // reserved name directly would recurse otherwise.
        if !name.is_reserved() {
            self.run_system(ctx, &TriggerName::before_trigger());
        }
        let mut handles = Vec::with_capacity(batch.len());
        for event in batch {
            let ectx = EventContext {
                event_id: event.id(),
                trigger: Some(name.clone()),
                cancel: ctx.clone(),
            };
            handles.push(tokio::spawn(async move {
                let output = event.run(&ectx);
                if let Some(sub) = event.subscriber() {
                    if sub.role() == Role::Publisher {
                        sub.activate();
                    }
                }
                output
            }));
        }
        if !name.is_reserved() {
            self.run_system(ctx, &TriggerName::after_trigger());
        }
        debug!(trigger = %name, launched = handles.len(), "trigger fired");
        Ok(TriggerHandle::new(handles))
    }

    /// Wires publishers to listeners in a many-to-many barrier and
    /// registers all participants.
    ///
    /// Every (publisher, listener) pair gets one dedicated link.
    /// Publishers must carry a trigger name and the publisher role;
    /// listeners the listener role (subscription alone anchors them).
    /// Barrier loops are spawned at first subscription per event.
    /// Batch semantics match [`register`](Self::register).
    pub fn subscribe<P, L>(
        &self,
        ctx: &CancelToken,
        publishers: P,
        listeners: L,
    ) -> Result<(), LoopError>
    where
        P: IntoIterator<Item = Result<Event, EventError>>,
        L: IntoIterator<Item = Result<Event, EventError>>,
    {
        self.check_entry(ctx, LoopFunc::Subscribe)?;
        let mut total = 0usize;
        let mut failures = Vec::new();

        let mut pubs: Vec<Arc<Event>> = Vec::new();
        for item in publishers {
            total += 1;
            match item.and_then(validate_publisher) {
                Ok(ev) => pubs.push(Arc::new(ev)),
                Err(err) => failures.push(LoopError::from(err)),
            }
        }
        let mut listens: Vec<Arc<Event>> = Vec::new();
        for item in listeners {
            total += 1;
            match item.and_then(validate_listener) {
                Ok(ev) => listens.push(Arc::new(ev)),
                Err(err) => failures.push(LoopError::from(err)),
            }
        }

        {
            let mut reg = self.registry.lock();
            for event in pubs.iter().chain(listens.iter()) {
                reg.add_event(Arc::clone(event));
            }
            for publisher in &pubs {
                for listener in &listens {
                    let (tx, rx) = link(publisher.id(), listener.id());
                    if let (Some(pub_sub), Some(listen_sub)) =
                        (publisher.subscriber(), listener.subscriber())
                    {
                        pub_sub.add_sender(tx);
                        listen_sub.add_receiver(rx);
                    }
                }
            }
        }

        for publisher in &pubs {
            subscribe::spawn_publisher_loop(Arc::clone(publisher), self.shutdown.clone());
            self.spawn_background(publisher);
            info!(event = %publisher.id(), "publisher subscribed");
        }
        for listener in &listens {
            subscribe::spawn_listener_loop(Arc::clone(listener), self.shutdown.clone());
            info!(event = %listener.id(), links = pubs.len(), "listener subscribed");
        }
        batch_result(total, failures)
    }

    /// Flips the global switch for each given verb; returns the new
    /// enabled state per verb. Toggling twice restores the original
    /// state.
    pub fn toggle_funcs(&self, funcs: &[LoopFunc]) -> Vec<(LoopFunc, bool)> {
        let mut disabled = self.disabled_funcs.lock();
        funcs
            .iter()
            .map(|func| {
                let enabled = if disabled.remove(func) {
                    true
                } else {
                    disabled.insert(*func);
                    false
                };
                info!(func = %func, enabled, "loop function toggled");
                (*func, enabled)
            })
            .collect()
    }

    /// Flips the per-name switch for each given trigger, independent
    /// of the global verb switches; returns the new enabled states.
    pub fn toggle_triggers(&self, names: &[TriggerName]) -> Vec<(TriggerName, bool)> {
        let mut reg = self.registry.lock();
        names
            .iter()
            .map(|name| {
                let enabled = reg.toggle_trigger(name);
                info!(trigger = %name, enabled, "trigger toggled");
                (name.clone(), enabled)
            })
            .collect()
    }

    /// Removes events by id; returns the ids that were not found.
    /// Background loops of removed events are unblocked before
    /// deletion.
    pub fn remove_events(&self, ids: &[EventId]) -> Vec<EventId> {
        self.registry.lock().remove_events(ids)
    }

    /// Removes whole trigger namespaces; returns the names that had
    /// no entry.
    pub fn remove_triggers(&self, names: &[TriggerName]) -> Vec<TriggerName> {
        self.registry.lock().remove_triggers(names)
    }

    /// Every trigger name with at least one attached event.
    #[must_use]
    pub fn trigger_names(&self) -> Vec<TriggerName> {
        self.registry.lock().trigger_names()
    }

    /// Summaries of the events attached to `name`, descending
    /// priority.
    #[must_use]
    pub fn attached_events(&self, name: &TriggerName) -> Vec<EventSummary> {
        self.registry.lock().attached_events(name)
    }

    /// Total number of registered events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Cancels the loop-wide token, stopping every background driver
    /// and barrier loop the loop ever spawned. Latched; subsequent
    /// operations fail with [`LoopError::Cancelled`].
    pub fn shutdown(&self) {
        info!("event loop shutting down");
        self.shutdown.cancel();
    }

    fn check_entry(&self, ctx: &CancelToken, func: LoopFunc) -> Result<(), LoopError> {
        if ctx.is_cancelled() || self.shutdown.is_cancelled() {
            return Err(LoopError::Cancelled);
        }
        if self.disabled_funcs.lock().contains(&func) {
            return Err(LoopError::FuncDisabled(func));
        }
        Ok(())
    }

    /// Attaches the background driver an event's shape calls for.
    ///
    /// The one-shot only drives after-only events; on a
    /// trigger-anchored event an After capability staggers the
    /// interval driver and otherwise stays passive, it never runs the
    /// payload on its own or touches the trigger attachment.
    fn spawn_background(&self, event: &Arc<Event>) {
        if event.has_interval() {
            scheduler::spawn_interval_driver(
                Arc::clone(event),
                Arc::clone(&self.registry),
                self.shutdown.clone(),
            );
        } else if event.has_after() && event.trigger_name().is_none() {
            scheduler::spawn_delayed_oneshot(
                Arc::clone(event),
                Arc::clone(&self.registry),
                self.shutdown.clone(),
            );
        }
    }

    /// Runs a reserved system trigger's events inline, in priority
    /// order, discarding outputs.
    fn run_system(&self, ctx: &CancelToken, name: &TriggerName) {
        let batch = {
            let mut reg = self.registry.lock();
            if !reg.is_trigger_enabled(name) {
                return;
            }
            claim_batch(&mut reg, name)
        };
        for event in batch {
            let ectx = EventContext {
                event_id: event.id(),
                trigger: Some(name.clone()),
                cancel: ctx.clone(),
            };
            let output = event.run(&ectx);
            debug!(trigger = %name, event = %event.id(), output = %output, "system event ran");
            if let Some(sub) = event.subscriber() {
                if sub.role() == Role::Publisher {
                    sub.activate();
                }
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Snapshots a trigger's batch in descending-priority order, spending
/// once gates and deregistering spent events while the lock is held.
///
/// Events whose gate was already spent by a racing call are excluded
/// from the batch; the winner both runs and deregisters them.
fn claim_batch(reg: &mut TriggerRegistry, name: &TriggerName) -> Vec<Arc<Event>> {
    let snapshot = reg.events_by_trigger(name);
    let mut batch = Vec::with_capacity(snapshot.len());
    let mut spent = Vec::new();
    for event in snapshot {
        match event.once() {
            Some(gate) => {
                if gate.fire() {
                    spent.push(event.id());
                    batch.push(event);
                }
            }
            None => batch.push(event),
        }
    }
    let _ = reg.remove_events(&spent);
    batch
}

/// Re-checks the anchor invariant on an already-built event; the loop
/// never trusts its input shape.
fn validate_shape(event: Event) -> Result<Event, EventError> {
    let anchored = event.trigger_name().is_some()
        || event.has_interval()
        || event.has_after()
        || event.is_listener();
    if anchored {
        Ok(event)
    } else {
        Err(EventError::InvalidShape(
            "event needs a trigger name, interval, or delayed start, or must be a listener".into(),
        ))
    }
}

fn validate_publisher(event: Event) -> Result<Event, EventError> {
    if event.trigger_name().is_some() && event.is_publisher() {
        Ok(event)
    } else {
        Err(EventError::InvalidShape(
            "publisher needs a trigger name and the publisher role".into(),
        ))
    }
}

fn validate_listener(event: Event) -> Result<Event, EventError> {
    if event.is_listener() {
        Ok(event)
    } else {
        Err(EventError::InvalidShape("listener needs the listener role".into()))
    }
}

fn batch_result(total: usize, mut failures: Vec<LoopError>) -> Result<(), LoopError> {
    match failures.len() {
        0 => Ok(()),
        1 if total == 1 => Err(failures.remove(0)),
        _ => Err(LoopError::Batch { total, failures }),
    }
}
