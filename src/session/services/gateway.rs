//! Session gateway: auth operations plus login/logout notifications.

use crate::config::Settings;
use crate::session::{
    domain::{AuthMethod, Credentials, SessionEvent, SessionEventKind, User},
    ports::{AuthProvider, AuthProviderError},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use super::Subscription;

/// Default capacity of the session event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Service-level errors for session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] crate::session::domain::SessionDomainError),
    /// The auth provider rejected the request.
    #[error(transparent)]
    Provider(#[from] AuthProviderError),
}

/// Result type for session gateway operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Wraps an [`AuthProvider`] and owns the session event emitter.
///
/// Successful logins publish [`SessionEvent::Login`]; logouts publish
/// [`SessionEvent::Logout`]. Registration never publishes.
pub struct SessionGateway<A>
where
    A: AuthProvider,
{
    provider: Arc<A>,
    events: broadcast::Sender<SessionEvent>,
    capacity: usize,
}

impl<A> SessionGateway<A>
where
    A: AuthProvider,
{
    /// Creates a gateway whose event channel buffers `capacity` events per
    /// subscriber. A zero capacity is raised to one.
    #[must_use]
    pub fn new(provider: Arc<A>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (events, _) = broadcast::channel(capacity);
        Self {
            provider,
            events,
            capacity,
        }
    }

    /// Creates a gateway sized by [`Settings::event_capacity`].
    #[must_use]
    pub fn with_settings(provider: Arc<A>, settings: &Settings) -> Self {
        Self::new(provider, settings.event_capacity)
    }

    /// Number of events buffered per subscriber before it lags.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the currently authenticated user, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Provider`] when the auth service fails.
    pub async fn current_user(&self) -> SessionResult<Option<User>> {
        Ok(self.provider.current_user().await?)
    }

    /// Logs in and publishes a login event.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Provider`] when authentication fails. No event
    /// is published in that case.
    pub async fn login(
        &self,
        method: AuthMethod,
        credentials: &Credentials,
    ) -> SessionResult<User> {
        let user = self
            .provider
            .login(method, credentials)
            .await
            .inspect_err(|err| {
                warn!(
                    email = %credentials.email(),
                    method = %method,
                    error = %err,
                    "login failed"
                );
            })?;
        info!(uid = %user.uid(), email = %user.email(), "user logged in");
        self.publish(SessionEvent::Login(user.clone()));
        Ok(user)
    }

    /// Ends the session and publishes a logout event.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Provider`] when the auth service fails.
    pub async fn logout(&self) -> SessionResult<()> {
        let previous = self.provider.logout().await?;
        match &previous {
            Some(user) => info!(uid = %user.uid(), "user logged out"),
            None => debug!("logout requested without an active session"),
        }
        self.publish(SessionEvent::Logout(previous));
        Ok(())
    }

    /// Creates an account and logs its identifier and email.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Provider`] when the account cannot be created.
    pub async fn register(&self, credentials: &Credentials) -> SessionResult<User> {
        let user = self
            .provider
            .create_user(credentials)
            .await
            .inspect_err(|err| {
                warn!(email = %credentials.email(), error = %err, "registration failed");
            })?;
        info!(uid = %user.uid(), email = %user.email(), "user registered");
        Ok(user)
    }

    /// Returns a receiver for every subsequent session event.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Invokes `callback` once per login event until the returned handle is
    /// dropped or unsubscribed.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn on_login<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + 'static,
    {
        self.on_kind(SessionEventKind::Login, callback)
    }

    /// Invokes `callback` once per logout event until the returned handle is
    /// dropped or unsubscribed.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn on_logout<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + 'static,
    {
        self.on_kind(SessionEventKind::Logout, callback)
    }

    fn on_kind<F>(&self, kind: SessionEventKind, callback: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + 'static,
    {
        // Subscribe before spawning so events published right after this
        // call are not missed.
        let mut receiver = self.events.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) if event.kind() == kind => callback(&event),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, ?kind, "session callback lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Subscription::new(handle)
    }

    fn publish(&self, event: SessionEvent) {
        let kind = event.kind();
        if self.events.send(event).is_err() {
            debug!(?kind, "session event published with no subscribers");
        }
    }
}
