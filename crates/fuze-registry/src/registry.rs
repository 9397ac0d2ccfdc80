//! Authoritative event store with derived indices.

use fuze_event::{Event, EventKind, EventSummary};
use fuze_types::{EventId, Priority, TriggerName};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Priority-indexed storage of events per trigger name.
///
/// See the crate docs for the index layout. Invariants upheld by every
/// mutation:
///
/// - ids are unique registry-wide (the authoritative map enforces it);
/// - empty priority buckets and empty trigger entries are pruned
///   eagerly on removal;
/// - no index references an id absent from the authoritative store;
/// - every removed event has [`Event::shutdown`] called before it
///   leaves the store, so no background loop leaks.
#[derive(Debug, Default)]
pub struct TriggerRegistry {
    /// Authoritative store.
    events: HashMap<EventId, Arc<Event>>,
    /// Derived: trigger name → priority → ids. `BTreeMap` so a
    /// descending scan is just a reverse iteration.
    by_trigger: HashMap<TriggerName, BTreeMap<Priority, HashSet<EventId>>>,
    /// Derived: capability tag → ids.
    by_kind: HashMap<EventKind, HashSet<EventId>>,
    /// Per-trigger kill switch; membership means disabled.
    disabled: HashSet<TriggerName>,
}

impl TriggerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an event, indexing it under its trigger name (if any)
    /// and its capability tags.
    ///
    /// Idempotent by id: re-inserting an already-stored event is a
    /// no-op and returns `false`.
    pub fn add_event(&mut self, event: Arc<Event>) -> bool {
        let id = event.id();
        if self.events.contains_key(&id) {
            debug!(event = %id, "already registered, skipping");
            return false;
        }

        if let Some(name) = event.trigger_name() {
            self.by_trigger
                .entry(name.clone())
                .or_default()
                .entry(event.priority())
                .or_default()
                .insert(id);
        }
        for kind in event.kinds() {
            self.by_kind.entry(kind).or_default().insert(id);
        }
        self.events.insert(id, event);
        true
    }

    /// Removes events by id, unblocking their background loops.
    ///
    /// Returns the subset of `ids` that was NOT found — empty means
    /// full success. Idempotent: removing the same ids again returns
    /// them all.
    pub fn remove_events(&mut self, ids: &[EventId]) -> Vec<EventId> {
        let mut missing = Vec::new();
        for id in ids {
            match self.events.remove(id) {
                Some(event) => {
                    event.shutdown();
                    self.detach(&event);
                    debug!(event = %id, "removed");
                }
                None => missing.push(*id),
            }
        }
        missing
    }

    /// Drops whole trigger namespaces with the same unblocking
    /// guarantee as [`remove_events`](Self::remove_events).
    ///
    /// Returns the subset of `names` that had no entry. A removed
    /// trigger's disabled flag is cleared as well.
    pub fn remove_triggers(&mut self, names: &[TriggerName]) -> Vec<TriggerName> {
        let mut missing = Vec::new();
        for name in names {
            let Some(buckets) = self.by_trigger.remove(name) else {
                missing.push(name.clone());
                continue;
            };
            self.disabled.remove(name);
            for id in buckets.into_values().flatten() {
                if let Some(event) = self.events.remove(&id) {
                    event.shutdown();
                    self.unindex_kinds(&event);
                }
            }
            debug!(trigger = %name, "trigger namespace removed");
        }
        missing
    }

    /// Events attached to `name`, descending priority. Ties within a
    /// priority bucket break arbitrarily.
    #[must_use]
    pub fn events_by_trigger(&self, name: &TriggerName) -> Vec<Arc<Event>> {
        let Some(buckets) = self.by_trigger.get(name) else {
            return Vec::new();
        };
        buckets
            .iter()
            .rev()
            .flat_map(|(_, ids)| ids.iter())
            .filter_map(|id| self.events.get(id).cloned())
            .collect()
    }

    /// Events carrying the given capability tag.
    #[must_use]
    pub fn events_by_kind(&self, kind: EventKind) -> Vec<Arc<Event>> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(|id| self.events.get(id).cloned())
            .collect()
    }

    /// Looks up one event by id.
    #[must_use]
    pub fn get(&self, id: EventId) -> Option<&Arc<Event>> {
        self.events.get(&id)
    }

    /// Returns `true` when the id is stored.
    #[must_use]
    pub fn contains(&self, id: EventId) -> bool {
        self.events.contains_key(&id)
    }

    /// Number of stored events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` when no event is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Every trigger name with at least one attached event.
    #[must_use]
    pub fn trigger_names(&self) -> Vec<TriggerName> {
        self.by_trigger.keys().cloned().collect()
    }

    /// Transport-facing summaries of the events attached to `name`,
    /// descending priority.
    #[must_use]
    pub fn attached_events(&self, name: &TriggerName) -> Vec<EventSummary> {
        self.events_by_trigger(name)
            .iter()
            .map(|ev| ev.summary())
            .collect()
    }

    /// Per-trigger kill switch. Disabling a name with no attached
    /// events is allowed — the flag applies when events arrive.
    pub fn set_trigger_enabled(&mut self, name: &TriggerName, enabled: bool) {
        if enabled {
            self.disabled.remove(name);
        } else {
            self.disabled.insert(name.clone());
        }
    }

    /// Flips the per-trigger switch; returns the new enabled state.
    pub fn toggle_trigger(&mut self, name: &TriggerName) -> bool {
        if self.disabled.remove(name) {
            true
        } else {
            self.disabled.insert(name.clone());
            false
        }
    }

    /// Returns `false` only for explicitly disabled names.
    #[must_use]
    pub fn is_trigger_enabled(&self, name: &TriggerName) -> bool {
        !self.disabled.contains(name)
    }

    /// Removes `event` from the trigger and kind indices, pruning
    /// emptied buckets. The authoritative entry must already be gone.
    fn detach(&mut self, event: &Arc<Event>) {
        if let Some(name) = event.trigger_name() {
            if let Some(buckets) = self.by_trigger.get_mut(name) {
                if let Some(ids) = buckets.get_mut(&event.priority()) {
                    ids.remove(&event.id());
                    if ids.is_empty() {
                        buckets.remove(&event.priority());
                    }
                }
                if buckets.is_empty() {
                    // The disabled flag outlives index pruning: only
                    // an explicit enable or remove_triggers clears it.
                    self.by_trigger.remove(name);
                }
            }
        }
        self.unindex_kinds(event);
    }

    fn unindex_kinds(&mut self, event: &Arc<Event>) {
        for kind in event.kinds() {
            if let Some(ids) = self.by_kind.get_mut(&kind) {
                ids.remove(&event.id());
                if ids.is_empty() {
                    self.by_kind.remove(&kind);
                }
            }
        }
    }

    /// Verifies the derived indices against the authoritative store.
    #[cfg(test)]
    fn verify_indices(&self) {
        for (name, buckets) in &self.by_trigger {
            assert!(!buckets.is_empty(), "empty trigger entry for {name}");
            for (priority, ids) in buckets {
                assert!(!ids.is_empty(), "empty bucket {name}/{priority}");
                for id in ids {
                    let event = self
                        .events
                        .get(id)
                        .unwrap_or_else(|| panic!("dangling {id} under {name}"));
                    assert_eq!(event.trigger_name(), Some(name));
                    assert_eq!(event.priority(), *priority);
                }
            }
        }
        for (kind, ids) in &self.by_kind {
            assert!(!ids.is_empty(), "empty kind set {kind}");
            for id in ids {
                let event = self
                    .events
                    .get(id)
                    .unwrap_or_else(|| panic!("dangling {id} under kind {kind}"));
                assert!(event.kinds().contains(kind));
            }
        }
        // Reverse direction: every stored event is fully indexed.
        for (id, event) in &self.events {
            if let Some(name) = event.trigger_name() {
                let indexed = self
                    .by_trigger
                    .get(name)
                    .and_then(|b| b.get(&event.priority()))
                    .is_some_and(|ids| ids.contains(id));
                assert!(indexed, "{id} missing from trigger index");
            }
            for kind in event.kinds() {
                let indexed = self.by_kind.get(&kind).is_some_and(|ids| ids.contains(id));
                assert!(indexed, "{id} missing from kind index");
            }
        }
    }
}
