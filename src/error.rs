//! Error taxonomy for construction-time and query-time failures.

use thiserror::Error;

/// Errors raised while streaming sequences into a [`Builder`](crate::builder::Builder).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BuilderError {
    /// `add` was called with a sequence not strictly greater than the
    /// previous one.
    #[error("sequence {next:?} is not strictly greater than previous sequence {previous:?}")]
    OutOfOrder { previous: String, next: String },

    /// `add` was called after `build`/`build_perfect_hash` already ran.
    #[error("builder was already finalized")]
    AlreadyFinalized,

    /// A sorted-container adapter was configured with a non-natural
    /// ordering and refused the input at ingest time.
    #[error("input container is not using natural lexicographic order")]
    UnsortedInput,
}

/// Errors raised by operations on an already-finalized, immutable
/// dictionary or value map.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QueryError {
    /// Attempted to mutate an immutable dictionary or value map.
    #[error("mutation is not supported on a finalized dictionary")]
    Unsupported,

    /// `sequence(rank)` was called with a rank outside `[1, N]`.
    #[error("rank {rank} is out of range [1, {max}]")]
    NotFound { rank: i64, max: usize },
}
