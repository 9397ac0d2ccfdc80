//! Fallible construction trait.
//!
//! Types whose construction requires validation implement [`TryNew`]
//! instead of offering a `new()` that can silently accept bad input.
//!
//! | Pattern | Use when |
//! |---------|----------|
//! | `new()` | Construction always succeeds |
//! | [`TryNew`] | Construction validates and may fail |
//! | `TryFrom<T>` | Fallible conversion from another type |
//! | Builder | Multi-field initialization (see `EventBuilder`) |
//!
//! The `try_` prefix mirrors the standard library's `TryFrom` and makes
//! fallibility explicit at the call site.

/// Trait for fallible construction with validation.
///
/// Implement this when construction requires validation that may fail
/// and you are not converting from another type (use `TryFrom` for
/// that). Types implementing `TryNew` should not also offer a plain
/// `new()` performing the same validation.
///
/// # Example
///
/// ```
/// use fuze_types::TryNew;
///
/// struct Percent(u8);
///
/// #[derive(Debug, PartialEq)]
/// struct OutOfRange;
///
/// impl TryNew for Percent {
///     type Error = OutOfRange;
///     type Args = u8;
///
///     fn try_new(value: u8) -> Result<Self, Self::Error> {
///         if value > 100 {
///             return Err(OutOfRange);
///         }
///         Ok(Percent(value))
///     }
/// }
///
/// assert!(Percent::try_new(42).is_ok());
/// assert!(Percent::try_new(142).is_err());
/// ```
pub trait TryNew: Sized {
    /// Error returned when validation fails.
    type Error;
    /// Arguments required for construction (use a tuple for several).
    type Args;

    /// Validates `args` and constructs the value.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when validation fails. Implementations
    /// must be pure: no side effects on the failure path.
    fn try_new(args: Self::Args) -> Result<Self, Self::Error>;
}
