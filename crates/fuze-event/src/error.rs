//! Event construction errors.
//!
//! Only construction can fail at this layer. Capability *absence* is
//! not an error anywhere in Fuze — accessors return `Option` and
//! callers branch ("capability negotiation"); nothing is surfaced to
//! end users for merely lacking a capability.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`EventError::MissingFunction`] | `EVENT_MISSING_FUNCTION` | No |
//! | [`EventError::InvalidName`] | `EVENT_INVALID_NAME` | No |
//! | [`EventError::InvalidShape`] | `EVENT_INVALID_SHAPE` | No |

use fuze_types::{ErrorCode, NameError};
use thiserror::Error;

/// Error produced by [`EventBuilder::build`](crate::EventBuilder::build).
///
/// All variants are caller bugs: the input will not become valid on
/// retry, so none is recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// No payload was set; the function is mandatory.
    #[error("event function is mandatory")]
    MissingFunction,

    /// The trigger name failed validation.
    #[error("invalid trigger name: {0}")]
    InvalidName(#[from] NameError),

    /// The anchor invariant is violated: no trigger name, interval, or
    /// delayed start, and the event is not a listener.
    #[error("invalid event shape: {0}")]
    InvalidShape(String),
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingFunction => "EVENT_MISSING_FUNCTION",
            Self::InvalidName(_) => "EVENT_INVALID_NAME",
            Self::InvalidShape(_) => "EVENT_INVALID_SHAPE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
