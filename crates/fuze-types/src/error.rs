//! Unified error interface.
//!
//! Every Fuze error type implements [`ErrorCode`]: a stable
//! machine-readable code plus recoverability information. Transports
//! map codes to status codes; loggers emit them as fields; retry
//! logic branches on `is_recoverable()`.
//!
//! # Code Format
//!
//! - UPPER_SNAKE_CASE
//! - prefixed with the owning layer: `EVENT_`, `REGISTRY_`, `LOOP_`
//! - stable once published (changing a code is a breaking change)
//!
//! # Recoverability
//!
//! An error is recoverable when retrying — possibly after corrective
//! action such as re-enabling a toggled verb — may succeed. Invalid
//! input is never recoverable: it will not change on retry.

/// Machine-readable error code interface.
///
/// # Example
///
/// ```
/// use fuze_types::ErrorCode;
///
/// #[derive(Debug)]
/// enum DialError {
///     Busy,
///     BadNumber,
/// }
///
/// impl ErrorCode for DialError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::Busy => "DIAL_BUSY",
///             Self::BadNumber => "DIAL_BAD_NUMBER",
///         }
///     }
///
///     fn is_recoverable(&self) -> bool {
///         matches!(self, Self::Busy)
///     }
/// }
///
/// assert_eq!(DialError::Busy.code(), "DIAL_BUSY");
/// assert!(DialError::Busy.is_recoverable());
/// ```
pub trait ErrorCode {
    /// Returns the stable UPPER_SNAKE_CASE code for this error.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that one error's code follows the Fuze conventions.
///
/// # Panics
///
/// Panics with a descriptive message when the code is empty, lacks the
/// expected prefix, or is not UPPER_SNAKE_CASE.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Asserts codes for every variant of an error enum at once.
///
/// # Example
///
/// ```
/// use fuze_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum E { A, B }
///
/// impl ErrorCode for E {
///     fn code(&self) -> &'static str {
///         match self { Self::A => "X_A", Self::B => "X_B" }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[E::A, E::B], "X_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
