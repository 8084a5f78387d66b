//! Authentication provider port.

use crate::session::domain::{AuthMethod, Credentials, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for authentication provider operations.
pub type AuthProviderResult<T> = Result<T, AuthProviderError>;

/// Contract of the backing authentication service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the currently authenticated user, or `None` when signed out.
    async fn current_user(&self) -> AuthProviderResult<Option<User>>;

    /// Authenticates with the given method and credentials and starts a
    /// session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::InvalidCredentials`] when the email is
    /// unknown or the password does not match.
    async fn login(&self, method: AuthMethod, credentials: &Credentials)
    -> AuthProviderResult<User>;

    /// Ends the current session and returns the user that was signed in.
    async fn logout(&self) -> AuthProviderResult<Option<User>>;

    /// Creates a new account. Does not start a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::EmailTaken`] when an account already
    /// exists for the email.
    async fn create_user(&self, credentials: &Credentials) -> AuthProviderResult<User>;
}

/// Errors returned by authentication provider implementations.
#[derive(Debug, Clone, Error)]
pub enum AuthProviderError {
    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// An account already exists for the email.
    #[error("an account already exists for {0}")]
    EmailTaken(String),

    /// The auth service could not be reached.
    #[error("authentication service unavailable")]
    Unavailable,

    /// Provider-specific failure.
    #[error("authentication provider error: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuthProviderError {
    /// Wraps a provider-specific error.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(err))
    }
}
