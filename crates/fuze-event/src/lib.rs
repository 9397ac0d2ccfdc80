//! Event model for the Fuze event engine.
//!
//! An [`Event`] is a composable unit of work: a payload function plus
//! any combination of optional capabilities that decide how and when
//! the payload runs.
//!
//! # Capabilities
//!
//! | Capability | Field | Effect |
//! |------------|-------|--------|
//! | trigger attachment | `TriggerName` | runs when its trigger fires |
//! | [`Interval`] | tick period + stop token | recurring background job |
//! | [`After`] | delayed start | one-shot (or interval pre-delay) |
//! | [`OnceGate`] | do-exactly-once gate | deregister after first fire |
//! | [`Subscriber`] | pub/sub role + links | barrier participant |
//!
//! Capabilities are plain optional fields behind `has_*` predicates and
//! `Option` accessors — absence is a branch, not an error.
//!
//! # Anchor Invariant
//!
//! An event must carry at least one *anchor* — a trigger name, an
//! interval, or a delayed start — unless it is a pub/sub listener,
//! which is anchored by subscription alone. [`EventBuilder::build`]
//! enforces this and returns [`EventError::InvalidShape`] otherwise.
//!
//! # Example
//!
//! ```
//! use fuze_event::EventBuilder;
//!
//! let event = EventBuilder::new()
//!     .with_trigger("ping")
//!     .with_priority(5)
//!     .action(|_ctx| "pong".to_string())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(event.trigger_name().unwrap().as_str(), "ping");
//! assert!(!event.has_interval());
//! ```

mod after;
mod builder;
mod cancel;
mod error;
mod event;
mod interval;
mod kind;
mod link;
mod once;
mod subscriber;

pub use after::{After, Deadline};
pub use builder::EventBuilder;
pub use cancel::CancelToken;
pub use error::EventError;
pub use event::{Event, EventContext, EventFn, EventSummary};
pub use interval::Interval;
pub use kind::EventKind;
pub use link::{link, LinkReceiver, LinkSender, Token};
pub use once::OnceGate;
pub use subscriber::{Role, Subscriber};
