//! Core types for the Fuze event engine.
//!
//! This crate provides the foundational types shared by every layer of
//! Fuze, the in-process event orchestration engine:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SDK Layer                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  fuze-types    : EventId, TriggerName, Priority  ◄── HERE   │
//! │  fuze-event    : Event, capabilities, EventBuilder          │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  fuze-registry : priority-indexed trigger registry          │
//! │  fuze-runtime  : EventLoop, scheduler, pub/sub barrier      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! Events are identified by [`EventId`], a UUID v4 newtype. UUIDs make
//! ids unique registry-wide without coordination and safe to hand to
//! external transports.
//!
//! Triggers are identified by [`TriggerName`], a validated non-empty
//! string. A small set of reserved names ([`TriggerName::BEFORE_TRIGGER`],
//! [`TriggerName::AFTER_TRIGGER`]) denote system triggers that the
//! runtime fires implicitly around every user trigger call.
//!
//! # Error Convention
//!
//! All Fuze error types implement [`ErrorCode`]: a stable
//! UPPER_SNAKE_CASE machine-readable code plus a recoverability flag.
//! Per-crate prefixes: `EVENT_`, `REGISTRY_`, `LOOP_`.
//!
//! # Example
//!
//! ```
//! use fuze_types::{EventId, Priority, TriggerName, TryNew};
//!
//! let id = EventId::new();
//! let name = TriggerName::try_new("deploy-finished").unwrap();
//! assert!(!name.is_reserved());
//!
//! let p = Priority::new(10);
//! assert!(p > Priority::default());
//! ```

mod construct;
mod error;
mod id;
mod priority;
mod trigger;

pub use construct::TryNew;
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::EventId;
pub use priority::Priority;
pub use trigger::{NameError, TriggerName};
