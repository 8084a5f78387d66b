//! Email and password credentials for the password provider.

use super::SessionDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authentication method understood by the backing auth service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Email and password authentication.
    Password,
}

impl AuthMethod {
    /// Returns the provider name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
        }
    }
}

impl TryFrom<&str> for AuthMethod {
    type Error = SessionDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "password" => Ok(Self::Password),
            _ => Err(SessionDomainError::UnsupportedAuthMethod(value.to_owned())),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated email address.
///
/// The value is trimmed and must contain exactly one `@` separating a
/// non-empty local part from a non-empty domain, with no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::InvalidEmail`] when the value is not a
    /// plausible `local@domain` address.
    pub fn new(value: impl Into<String>) -> Result<Self, SessionDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let mut parts = normalized.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let is_valid = !local.is_empty()
            && !domain.is_empty()
            && parts.next().is_none()
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(SessionDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty password. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a password.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::EmptyPassword`] for an empty value.
    pub fn new(value: impl Into<String>) -> Result<Self, SessionDomainError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(SessionDomainError::EmptyPassword);
        }
        Ok(Self(raw))
    }

    /// Exposes the secret for hashing by auth adapters.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Credential pair submitted to login and registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: Email,
    password: Password,
}

impl Credentials {
    /// Validates and pairs an email and password.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError`] when either field is invalid.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, SessionDomainError> {
        Ok(Self {
            email: Email::new(email)?,
            password: Password::new(password)?,
        })
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}
