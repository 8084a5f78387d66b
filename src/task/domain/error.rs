//! Error types for task domain validation and decoding.

use thiserror::Error;

/// Errors returned while constructing or decoding task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A path segment is empty or contains a `/`.
    #[error("invalid path segment '{0}'")]
    InvalidPathSegment(String),

    /// A category label is empty or contains a `/`.
    #[error("invalid category '{0}'")]
    InvalidCategory(String),

    /// A child key is empty or contains a `/`.
    #[error("invalid child key '{0}'")]
    InvalidChildKey(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A stored child does not have the task record shape.
    #[error("child {key} is not a task record: {reason}")]
    MalformedRecord {
        /// Key of the offending child.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// A stored timestamp is outside the representable range.
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}
