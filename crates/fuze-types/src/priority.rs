//! Event priority.
//!
//! Priorities order launches within a single trigger fire: higher
//! priority events are launched first. Ties break arbitrarily, and
//! completion order is never constrained by priority.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Launch priority of an event under a trigger.
///
/// Plain `i32` semantics: higher launches first, default is `0`,
/// negative values launch after the default bucket.
///
/// # Example
///
/// ```
/// use fuze_types::Priority;
///
/// let urgent = Priority::new(10);
/// let normal = Priority::default();
/// assert!(urgent > normal);
/// assert_eq!(normal.get(), 0);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Priority(i32);

impl Priority {
    /// Creates a priority with the given rank.
    #[must_use]
    pub fn new(rank: i32) -> Self {
        Self(rank)
    }

    /// Returns the raw rank.
    #[must_use]
    pub fn get(&self) -> i32 {
        self.0
    }
}

impl From<i32> for Priority {
    fn from(rank: i32) -> Self {
        Self(rank)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
