//! Authenticated user identity.

use super::{AuthMethod, Email, SessionDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque user identifier assigned by the auth service.
///
/// The identifier becomes the first segment of every task path, so it must
/// be non-empty and must not contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a validated user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::InvalidUserId`] when the value is empty
    /// after trimming or contains a `/`.
    pub fn new(value: impl Into<String>) -> Result<Self, SessionDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.contains('/') {
            return Err(SessionDomainError::InvalidUserId(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    uid: UserId,
    email: Email,
    method: AuthMethod,
}

impl User {
    /// Creates a user record.
    #[must_use]
    pub const fn new(uid: UserId, email: Email, method: AuthMethod) -> Self {
        Self { uid, email, method }
    }

    /// Returns the unique identifier.
    #[must_use]
    pub const fn uid(&self) -> &UserId {
        &self.uid
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the method the user authenticated with.
    #[must_use]
    pub const fn method(&self) -> AuthMethod {
        self.method
    }
}
