//! Trigger registry for the Fuze event engine.
//!
//! [`TriggerRegistry`] is the priority-indexed storage of events per
//! trigger name. One UUID-keyed map is the authoritative store; the
//! trigger/priority and kind indices are derived from it and rebuilt
//! incrementally on every insert and remove, so an id can never dangle
//! in an index without existing in the store.
//!
//! ```text
//!            events: EventId ─► Arc<Event>          (authoritative)
//!                      ▲                ▲
//!        by_trigger ───┘                └─── by_kind
//!   name ─► priority ─► {EventId}      kind ─► {EventId}
//! ```
//!
//! The registry is plain data: it performs no locking and spawns no
//! tasks. The event loop owns it behind one coarse lock so mutation
//! and iteration are mutually exclusive. What the registry *does*
//! guarantee is lifecycle-safe removal: every removed event has its
//! background loops unblocked (interval stop, delayed-start break,
//! barrier exit) before it leaves the store.

mod registry;

pub use registry::TriggerRegistry;
