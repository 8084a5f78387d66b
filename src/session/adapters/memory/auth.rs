//! In-memory password authentication for tests and offline use.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::session::{
    domain::{AuthMethod, Credentials, Email, Password, User, UserId},
    ports::{AuthProvider, AuthProviderError, AuthProviderResult},
};

/// Thread-safe in-memory auth provider.
///
/// Accounts receive sequential `simplelogin:<n>` identifiers. Passwords are
/// stored as salted SHA-256 digests.
#[derive(Debug, Clone)]
pub struct InMemoryAuthProvider {
    state: Arc<RwLock<AuthState>>,
}

#[derive(Debug)]
struct AuthState {
    accounts: HashMap<Email, Account>,
    session: Option<User>,
    next_id: u64,
    available: bool,
}

#[derive(Debug)]
struct Account {
    uid: UserId,
    salt: Uuid,
    digest: Vec<u8>,
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(AuthState {
                accounts: HashMap::new(),
                session: None,
                next_id: 1,
                available: true,
            })),
        }
    }
}

impl InMemoryAuthProvider {
    /// Creates a provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the auth service going offline (`false`) or returning.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::Provider`] when the state lock is
    /// poisoned.
    pub fn set_available(&self, available: bool) -> AuthProviderResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.available = available;
        Ok(())
    }

    /// Number of registered accounts.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::Provider`] when the state lock is
    /// poisoned.
    pub fn account_count(&self) -> AuthProviderResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.accounts.len())
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> AuthProviderError {
    AuthProviderError::provider(std::io::Error::other(err.to_string()))
}

fn digest(salt: &Uuid, password: &Password) -> Vec<u8> {
    Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.expose().as_bytes())
        .finalize()
        .to_vec()
}

fn ensure_available(state: &AuthState) -> AuthProviderResult<()> {
    if state.available {
        Ok(())
    } else {
        Err(AuthProviderError::Unavailable)
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn current_user(&self) -> AuthProviderResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        ensure_available(&state)?;
        Ok(state.session.clone())
    }

    async fn login(
        &self,
        method: AuthMethod,
        credentials: &Credentials,
    ) -> AuthProviderResult<User> {
        let mut state = self.state.write().map_err(poisoned)?;
        ensure_available(&state)?;
        let account = state
            .accounts
            .get(credentials.email())
            .ok_or(AuthProviderError::InvalidCredentials)?;
        if digest(&account.salt, credentials.password()) != account.digest {
            return Err(AuthProviderError::InvalidCredentials);
        }

        let user = User::new(account.uid.clone(), credentials.email().clone(), method);
        state.session = Some(user.clone());
        Ok(user)
    }

    async fn logout(&self) -> AuthProviderResult<Option<User>> {
        let mut state = self.state.write().map_err(poisoned)?;
        ensure_available(&state)?;
        Ok(state.session.take())
    }

    async fn create_user(&self, credentials: &Credentials) -> AuthProviderResult<User> {
        let mut state = self.state.write().map_err(poisoned)?;
        ensure_available(&state)?;
        if state.accounts.contains_key(credentials.email()) {
            return Err(AuthProviderError::EmailTaken(
                credentials.email().as_str().to_owned(),
            ));
        }

        let uid = UserId::new(format!("simplelogin:{}", state.next_id))
            .map_err(AuthProviderError::provider)?;
        state.next_id += 1;
        let salt = Uuid::new_v4();
        state.accounts.insert(
            credentials.email().clone(),
            Account {
                uid: uid.clone(),
                salt,
                digest: digest(&salt, credentials.password()),
            },
        );
        Ok(User::new(
            uid,
            credentials.email().clone(),
            AuthMethod::Password,
        ))
    }
}
