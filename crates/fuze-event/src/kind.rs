//! Capability tags for secondary indexing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag for one attached capability of an [`Event`](crate::Event).
///
/// The registry maintains a kind index so callers can enumerate, say,
/// every interval-capable event without scanning the whole store.
/// [`Event::kinds`](crate::Event::kinds) returns the currently
/// attached set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Attached to a trigger name.
    Triggered,
    /// Carries a recurring interval.
    Interval,
    /// Carries a delayed start.
    After,
    /// Fires at most once, deregistered afterwards.
    Once,
    /// Publisher side of the pub/sub barrier.
    Publisher,
    /// Listener side of the pub/sub barrier.
    Listener,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Triggered => "triggered",
            Self::Interval => "interval",
            Self::After => "after",
            Self::Once => "once",
            Self::Publisher => "publisher",
            Self::Listener => "listener",
        };
        f.write_str(s)
    }
}
