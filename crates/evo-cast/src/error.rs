use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CastError {
    /// No candidate could be produced for an open type after every fallback was tried.
    ///
    /// Recoverable: the caller should abandon the enclosing construction attempt.
    #[error("no assignable type for `{open_type}` (bounds: [{}])", .bounds.join(", "))]
    NoAssignableType {
        open_type: String,
        bounds: Vec<String>,
    },
    /// A candidate whose erasure is not a class was offered for registration.
    #[error("candidate `{candidate}` does not erase to a known class")]
    InvalidCandidate { candidate: String },
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },
}
