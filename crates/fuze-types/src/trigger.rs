//! Trigger names.
//!
//! A trigger is a named invocation channel: firing it runs every event
//! currently attached to that name. Names are plain strings, validated
//! non-empty at construction.
//!
//! # Reserved Names
//!
//! Two names are reserved for system triggers that the runtime fires
//! implicitly around every user trigger call:
//!
//! | Name | When |
//! |------|------|
//! | `BEFORE_TRIGGER` | synchronously, before the main batch launches |
//! | `AFTER_TRIGGER`  | synchronously, after the main batch launches  |
//!
//! Events may be registered under reserved names like any other; the
//! runtime simply runs them at the bracketing points instead of on an
//! explicit fire.

use crate::construct::TryNew;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error produced when a trigger name fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Trigger names must be non-empty.
    #[error("trigger name must not be empty")]
    Empty,
}

/// A validated, non-empty trigger name.
///
/// # Example
///
/// ```
/// use fuze_types::{TriggerName, TryNew};
///
/// let name = TriggerName::try_new("build-done").unwrap();
/// assert_eq!(name.as_str(), "build-done");
/// assert!(!name.is_reserved());
///
/// assert!(TriggerName::try_new("").is_err());
/// assert!(TriggerName::before_trigger().is_reserved());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerName(String);

impl TriggerName {
    /// Reserved name run synchronously before every user trigger call.
    pub const BEFORE_TRIGGER: &'static str = "BEFORE_TRIGGER";
    /// Reserved name run synchronously after every user trigger call.
    pub const AFTER_TRIGGER: &'static str = "AFTER_TRIGGER";

    /// Returns the `BEFORE_TRIGGER` system name.
    #[must_use]
    pub fn before_trigger() -> Self {
        Self(Self::BEFORE_TRIGGER.to_string())
    }

    /// Returns the `AFTER_TRIGGER` system name.
    #[must_use]
    pub fn after_trigger() -> Self {
        Self(Self::AFTER_TRIGGER.to_string())
    }

    /// Returns `true` for reserved system trigger names.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.0 == Self::BEFORE_TRIGGER || self.0 == Self::AFTER_TRIGGER
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryNew for TriggerName {
    type Error = NameError;
    type Args = &'static str;

    fn try_new(name: &'static str) -> Result<Self, NameError> {
        Self::try_from(name)
    }
}

impl TryFrom<&str> for TriggerName {
    type Error = NameError;

    fn try_from(name: &str) -> Result<Self, NameError> {
        Self::try_from(name.to_string())
    }
}

impl TryFrom<String> for TriggerName {
    type Error = NameError;

    fn try_from(name: String) -> Result<Self, NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        Ok(Self(name))
    }
}

// Display is the bare name, no prefix, so log lines and transport
// payloads read naturally.
impl fmt::Display for TriggerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
