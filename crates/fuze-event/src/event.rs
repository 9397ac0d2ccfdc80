//! The composable Event.

use crate::{After, CancelToken, EventKind, Interval, OnceGate, Role, Subscriber};
use fuze_types::{EventId, Priority, TriggerName};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Payload of an event: runs in the caller's task and yields a result
/// string. Callers decide whether to run it inline (system events) or
/// as an independent spawned task (the main trigger batch).
pub type EventFn = Arc<dyn Fn(&EventContext) -> String + Send + Sync>;

/// Execution context handed to a payload run.
#[derive(Debug, Clone)]
pub struct EventContext {
    /// Id of the running event.
    pub event_id: EventId,
    /// Trigger that fired this run, when fired through the trigger
    /// path. `None` for scheduler ticks and barrier rounds.
    pub trigger: Option<TriggerName>,
    /// Caller's cancellation token, for payloads that block.
    pub cancel: CancelToken,
}

/// A composable unit of work.
///
/// Identity plus payload plus any combination of capabilities; see the
/// crate docs for the capability table and the anchor invariant.
/// Constructed only through [`EventBuilder`](crate::EventBuilder),
/// which validates the shape.
pub struct Event {
    id: EventId,
    trigger: Option<TriggerName>,
    priority: Priority,
    func: EventFn,
    once: Option<OnceGate>,
    interval: Option<Interval>,
    after: Option<After>,
    subscriber: Option<Subscriber>,
}

impl Event {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        trigger: Option<TriggerName>,
        priority: Priority,
        func: EventFn,
        once: Option<OnceGate>,
        interval: Option<Interval>,
        after: Option<After>,
        subscriber: Option<Subscriber>,
    ) -> Self {
        Self {
            id: EventId::new(),
            trigger,
            priority,
            func,
            once,
            interval,
            after,
            subscriber,
        }
    }

    /// Immutable identity, assigned at construction.
    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Trigger this event is attachable under, if any.
    #[must_use]
    pub fn trigger_name(&self) -> Option<&TriggerName> {
        self.trigger.as_ref()
    }

    /// Launch priority under its trigger.
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Runs the payload synchronously in the caller's task.
    #[must_use]
    pub fn run(&self, ctx: &EventContext) -> String {
        (self.func)(ctx)
    }

    /// Once capability, if attached.
    #[must_use]
    pub fn once(&self) -> Option<&OnceGate> {
        self.once.as_ref()
    }

    /// Interval capability, if attached.
    #[must_use]
    pub fn interval(&self) -> Option<&Interval> {
        self.interval.as_ref()
    }

    /// After capability, if attached.
    #[must_use]
    pub fn after(&self) -> Option<&After> {
        self.after.as_ref()
    }

    /// Pub/sub capability, if attached.
    #[must_use]
    pub fn subscriber(&self) -> Option<&Subscriber> {
        self.subscriber.as_ref()
    }

    /// Pub/sub role, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.subscriber.as_ref().map(Subscriber::role)
    }

    #[must_use]
    pub fn has_once(&self) -> bool {
        self.once.is_some()
    }

    #[must_use]
    pub fn has_interval(&self) -> bool {
        self.interval.is_some()
    }

    #[must_use]
    pub fn has_after(&self) -> bool {
        self.after.is_some()
    }

    #[must_use]
    pub fn is_publisher(&self) -> bool {
        self.role() == Some(Role::Publisher)
    }

    #[must_use]
    pub fn is_listener(&self) -> bool {
        self.role() == Some(Role::Listener)
    }

    /// Currently attached capability tags, for secondary indexing.
    #[must_use]
    pub fn kinds(&self) -> Vec<EventKind> {
        let mut kinds = Vec::new();
        if self.trigger.is_some() {
            kinds.push(EventKind::Triggered);
        }
        if self.interval.is_some() {
            kinds.push(EventKind::Interval);
        }
        if self.after.is_some() {
            kinds.push(EventKind::After);
        }
        if self.once.is_some() {
            kinds.push(EventKind::Once);
        }
        match self.role() {
            Some(Role::Publisher) => kinds.push(EventKind::Publisher),
            Some(Role::Listener) => kinds.push(EventKind::Listener),
            None => {}
        }
        kinds
    }

    /// Unblocks every background loop attached to this event: the
    /// interval driver, a pending delayed start, and the barrier loop.
    ///
    /// Called by the registry before deletion so no task outlives its
    /// event. Idempotent.
    pub fn shutdown(&self) {
        tracing::debug!(event = %self.id, "unblocking background loops");
        if let Some(interval) = &self.interval {
            interval.halt();
        }
        if let Some(after) = &self.after {
            after.interrupt();
        }
        if let Some(subscriber) = &self.subscriber {
            subscriber.close();
        }
    }

    /// Transport-facing snapshot of this event's shape.
    #[must_use]
    pub fn summary(&self) -> EventSummary {
        EventSummary {
            id: self.id,
            trigger: self.trigger.clone(),
            priority: self.priority,
            kinds: self.kinds(),
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("id", &self.id)
            .field("trigger", &self.trigger)
            .field("priority", &self.priority)
            .field("kinds", &self.kinds())
            .finish_non_exhaustive()
    }
}

/// Serializable description of one registered event.
///
/// What the transport collaborator sees when listing attachments —
/// the live event (with its payload closure and channel state) never
/// crosses the API boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    /// Event id.
    pub id: EventId,
    /// Trigger the event is attached under, if any.
    pub trigger: Option<TriggerName>,
    /// Launch priority.
    pub priority: Priority,
    /// Attached capability tags.
    pub kinds: Vec<EventKind>,
}
