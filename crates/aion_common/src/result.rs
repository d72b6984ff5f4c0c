//! Common result and error types for the routing back end.

/// The standard result type for fallible internal operations.
///
/// `Ok` carries the result, which may be partial after recoverable failures
/// such as an unroutable sink. `Err` means the caller misused an internal
/// structure (for example, asked a pool about a value it never saw). Problems
/// in the user's design are reported through the diagnostic sink instead, and
/// the operation still returns `Ok`.
pub type AionResult<T> = Result<T, InternalError>;

/// A programming error inside the router or device model.
///
/// Never expected in normal operation; surfacing one means a caller broke an
/// invariant of the structure it was using.
#[derive(Debug, thiserror::Error)]
#[error("internal routing error: {message}")]
pub struct InternalError {
    /// Description of the broken invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
