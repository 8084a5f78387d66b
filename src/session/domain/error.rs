//! Error types for session domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing session domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionDomainError {
    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// The user identifier is empty or contains a path separator.
    #[error("invalid user identifier '{0}'")]
    InvalidUserId(String),

    /// The authentication provider name is not supported.
    #[error("unsupported authentication method: {0}")]
    UnsupportedAuthMethod(String),
}
