//! Internal error type for pipeline bugs.

/// Result type for operations whose only failure mode is a pipeline bug.
///
/// User-facing failures (cycles, tag mismatches, missing compilers) have their
/// own typed errors in the crates that detect them.
pub type LoomResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in loom, not a problem with the artifact
/// being built.
#[derive(Debug, thiserror::Error)]
#[error("internal build error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
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
