//! Validating factory for [`Event`].

use crate::event::{Event, EventContext, EventFn};
use crate::{After, EventError, Interval, OnceGate, Role, Subscriber};
use fuze_types::{Priority, TriggerName};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Builder for [`Event`], the only way to construct one.
///
/// `build()` enforces the anchor invariant: a payload is mandatory,
/// and at least one of trigger name / interval / delayed start must be
/// set unless the event is a pub/sub listener (anchored by
/// subscription alone).
///
/// # Example
///
/// ```
/// use fuze_event::EventBuilder;
/// use std::time::Duration;
///
/// // Recurring job, first run staggered by 100ms.
/// let event = EventBuilder::new()
///     .every(Duration::from_secs(5))
///     .delayed_by(Duration::from_millis(100))
///     .action(|_| "tick".to_string())
///     .build()
///     .unwrap();
/// assert!(event.has_interval());
///
/// // Anchorless events are rejected.
/// let err = EventBuilder::new().action(|_| String::new()).build();
/// assert!(err.is_err());
/// ```
#[derive(Default)]
pub struct EventBuilder {
    trigger: Option<String>,
    priority: Priority,
    func: Option<EventFn>,
    once: bool,
    every: Option<Duration>,
    delay: Option<DelaySpec>,
    role: Option<Role>,
}

enum DelaySpec {
    At(Instant),
    In(Duration),
}

impl EventBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the event under a trigger name.
    #[must_use]
    pub fn with_trigger(mut self, name: impl Into<String>) -> Self {
        self.trigger = Some(name.into());
        self
    }

    /// Sets the launch priority (default 0; higher launches first).
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Marks the event fire-once: deregistered after its first run.
    #[must_use]
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Attaches a recurring interval with the given tick period.
    #[must_use]
    pub fn every(mut self, period: Duration) -> Self {
        self.every = Some(period);
        self
    }

    /// Delays the first execution by a relative offset.
    ///
    /// Mutually exclusive with [`starting_at`](Self::starting_at);
    /// the last call wins.
    #[must_use]
    pub fn delayed_by(mut self, offset: Duration) -> Self {
        self.delay = Some(DelaySpec::In(offset));
        self
    }

    /// Delays the first execution until an absolute instant.
    #[must_use]
    pub fn starting_at(mut self, instant: Instant) -> Self {
        self.delay = Some(DelaySpec::At(instant));
        self
    }

    /// Gives the event the publisher role in the pub/sub barrier.
    #[must_use]
    pub fn as_publisher(mut self) -> Self {
        self.role = Some(Role::Publisher);
        self
    }

    /// Gives the event the listener role in the pub/sub barrier.
    #[must_use]
    pub fn as_listener(mut self) -> Self {
        self.role = Some(Role::Listener);
        self
    }

    /// Sets the payload. Mandatory.
    #[must_use]
    pub fn action<F>(mut self, func: F) -> Self
    where
        F: Fn(&EventContext) -> String + Send + Sync + 'static,
    {
        self.func = Some(Arc::new(func));
        self
    }

    /// Validates the shape and assembles the event.
    ///
    /// # Errors
    ///
    /// - [`EventError::MissingFunction`] when no payload was set.
    /// - [`EventError::InvalidName`] when the trigger name is empty.
    /// - [`EventError::InvalidShape`] when no anchor capability is set
    ///   and the event is not a listener.
    pub fn build(self) -> Result<Event, EventError> {
        let func = self.func.ok_or(EventError::MissingFunction)?;

        let trigger = self
            .trigger
            .map(TriggerName::try_from)
            .transpose()
            .map_err(EventError::InvalidName)?;

        let anchored = trigger.is_some()
            || self.every.is_some()
            || self.delay.is_some()
            || self.role == Some(Role::Listener);
        if !anchored {
            return Err(EventError::InvalidShape(
                "event needs a trigger name, an interval, or a delayed start \
                 (or the listener role)"
                    .to_string(),
            ));
        }

        let after = self.delay.map(|spec| match spec {
            DelaySpec::At(instant) => After::at(instant),
            DelaySpec::In(offset) => After::delayed_by(offset),
        });

        Ok(Event::assemble(
            trigger,
            self.priority,
            func,
            self.once.then(OnceGate::new),
            self.every.map(Interval::new),
            after,
            self.role.map(Subscriber::new),
        ))
    }
}
