//! Orchestration errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`LoopError::Cancelled`] | `LOOP_CANCELLED` | Yes |
//! | [`LoopError::FuncDisabled`] | `LOOP_FUNC_DISABLED` | Yes (re-enable and retry) |
//! | [`LoopError::TriggerDisabled`] | `LOOP_TRIGGER_DISABLED` | Yes (re-enable and retry) |
//! | [`LoopError::InvalidEvent`] | `LOOP_INVALID_EVENT` | No |
//! | [`LoopError::Batch`] | `LOOP_BATCH` | No |
//!
//! Unknown ids and names are NOT errors anywhere in the loop API:
//! removals return leftover lists, an unattached trigger fires zero
//! events successfully.

use crate::eventloop::LoopFunc;
use fuze_event::EventError;
use fuze_types::{ErrorCode, TriggerName};
use thiserror::Error;

/// Error produced by [`EventLoop`](crate::EventLoop) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoopError {
    /// The caller's token (or the loop-wide token) was already
    /// cancelled at entry.
    #[error("operation cancelled")]
    Cancelled,

    /// The verb is globally disabled via
    /// [`toggle_funcs`](crate::EventLoop::toggle_funcs).
    #[error("loop function '{0}' is disabled")]
    FuncDisabled(LoopFunc),

    /// The named trigger is disabled via
    /// [`toggle_triggers`](crate::EventLoop::toggle_triggers).
    #[error("trigger '{0}' is disabled")]
    TriggerDisabled(TriggerName),

    /// An event failed validation during a register or subscribe call.
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] EventError),

    /// Combined per-item failures of a batch call. Valid siblings in
    /// the same batch were still processed.
    #[error("{} of {total} events failed", failures.len())]
    Batch {
        /// Number of events in the batch.
        total: usize,
        /// One entry per failed event.
        failures: Vec<LoopError>,
    },
}

impl ErrorCode for LoopError {
    fn code(&self) -> &'static str {
        match self {
            Self::Cancelled => "LOOP_CANCELLED",
            Self::FuncDisabled(_) => "LOOP_FUNC_DISABLED",
            Self::TriggerDisabled(_) => "LOOP_TRIGGER_DISABLED",
            Self::InvalidEvent(_) => "LOOP_INVALID_EVENT",
            Self::Batch { .. } => "LOOP_BATCH",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::FuncDisabled(_) | Self::TriggerDisabled(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuze_types::assert_error_codes;

    fn all_variants() -> Vec<LoopError> {
        vec![
            LoopError::Cancelled,
            LoopError::FuncDisabled(LoopFunc::Register),
            LoopError::TriggerDisabled(TriggerName::try_from("t").expect("valid name")),
            LoopError::InvalidEvent(EventError::MissingFunction),
            LoopError::Batch {
                total: 2,
                failures: vec![LoopError::InvalidEvent(EventError::MissingFunction)],
            },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "LOOP_");
    }

    #[test]
    fn recoverability_split() {
        for err in all_variants() {
            let expected = matches!(
                err,
                LoopError::Cancelled
                    | LoopError::FuncDisabled(_)
                    | LoopError::TriggerDisabled(_)
            );
            assert_eq!(err.is_recoverable(), expected, "{err}");
        }
    }

    #[test]
    fn event_error_converts() {
        let err: LoopError = EventError::InvalidShape("no anchor".into()).into();
        assert_eq!(err.code(), "LOOP_INVALID_EVENT");
    }

    #[test]
    fn batch_reports_failure_count() {
        let err = LoopError::Batch {
            total: 3,
            failures: vec![
                LoopError::InvalidEvent(EventError::MissingFunction),
                LoopError::InvalidEvent(EventError::MissingFunction),
            ],
        };
        assert_eq!(err.to_string(), "2 of 3 events failed");
    }
}
