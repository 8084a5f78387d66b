//! Two-state controller binding the session to the displayed task list.

use crate::config::Settings;
use crate::session::{
    domain::{AuthMethod, Credentials, SessionEvent, User},
    ports::AuthProvider,
    services::{SessionError, SessionGateway},
};
use crate::task::{
    domain::{ChildKey, Task},
    ports::RealtimeStore,
    services::{TaskStore, TaskStoreError},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Errors surfaced by controller actions.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// A task operation failed.
    #[error(transparent)]
    TaskStore(#[from] TaskStoreError),
}

/// Result type for controller actions.
pub type ViewResult<T> = Result<T, ViewError>;

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No task list is bound; the displayed list is empty.
    LoggedOut,
    /// The displayed list is bound to a live task store.
    LoggedIn,
}

/// Login form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email field.
    pub email: String,
    /// Password field.
    pub password: String,
}

impl LoginForm {
    fn credentials(&self) -> Result<Credentials, SessionError> {
        Ok(Credentials::new(self.email.as_str(), self.password.as_str())?)
    }
}

/// Wires form input and session events to a task store.
///
/// A login event opens a [`TaskStore`] for the configured default category
/// and binds the displayed list to it. A logout event closes that store and
/// empties the list.
pub struct TaskViewController<A, S>
where
    A: AuthProvider,
    S: RealtimeStore + 'static,
{
    gateway: Arc<SessionGateway<A>>,
    store: Arc<S>,
    settings: Settings,
    events: broadcast::Receiver<SessionEvent>,
    active: Option<TaskStore<S>>,
    form: LoginForm,
    new_task: String,
}

impl<A, S> TaskViewController<A, S>
where
    A: AuthProvider,
    S: RealtimeStore + 'static,
{
    /// Creates a logged-out controller subscribed to the gateway's events.
    #[must_use]
    pub fn new(gateway: Arc<SessionGateway<A>>, store: Arc<S>, settings: Settings) -> Self {
        let events = gateway.subscribe();
        Self {
            gateway,
            store,
            settings,
            events,
            active: None,
            form: LoginForm::default(),
            new_task: String::new(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ViewState {
        if self.active.is_some() {
            ViewState::LoggedIn
        } else {
            ViewState::LoggedOut
        }
    }

    /// Returns the user whose tasks are displayed.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.active.as_ref().map(TaskStore::user)
    }

    /// Returns the active task store, if logged in.
    #[must_use]
    pub const fn task_store(&self) -> Option<&TaskStore<S>> {
        self.active.as_ref()
    }

    /// Returns the displayed task list. Empty while logged out.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.active
            .as_ref()
            .map(TaskStore::tasks)
            .unwrap_or_default()
    }

    /// Returns a receiver following the displayed list while logged in.
    #[must_use]
    pub fn binding(&self) -> Option<watch::Receiver<Vec<Task>>> {
        self.active.as_ref().map(TaskStore::binding)
    }

    /// Returns the login form.
    #[must_use]
    pub const fn form(&self) -> &LoginForm {
        &self.form
    }

    /// Returns the login form for editing.
    pub const fn form_mut(&mut self) -> &mut LoginForm {
        &mut self.form
    }

    /// Returns the pending task title.
    #[must_use]
    pub fn new_task(&self) -> &str {
        &self.new_task
    }

    /// Replaces the pending task title.
    pub fn set_new_task(&mut self, title: impl Into<String>) {
        self.new_task = title.into();
    }

    /// Logs in with the form's email and password.
    ///
    /// The transition to [`ViewState::LoggedIn`] happens when the resulting
    /// login event is processed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Session`] when the form is invalid or login fails.
    pub async fn login(&self) -> ViewResult<User> {
        let credentials = self.form.credentials()?;
        Ok(self
            .gateway
            .login(AuthMethod::Password, &credentials)
            .await?)
    }

    /// Logs out. The list is cleared when the logout event is processed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Session`] when the auth service fails.
    pub async fn logout(&self) -> ViewResult<()> {
        Ok(self.gateway.logout().await?)
    }

    /// Registers an account with the form's email and password.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Session`] when the form is invalid or the
    /// account cannot be created.
    pub async fn register(&self) -> ViewResult<User> {
        let credentials = self.form.credentials()?;
        Ok(self.gateway.register(&credentials).await?)
    }

    /// Handles a key press in the new-task field.
    ///
    /// Only the configured confirmation key adds the pending title; the
    /// field is cleared and the assigned key returned. Other keys, a blank
    /// title, or a logged-out state do nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::TaskStore`] when the write fails.
    pub async fn add(&mut self, key_code: u32) -> ViewResult<Option<ChildKey>> {
        if key_code != self.settings.confirm_key {
            return Ok(None);
        }
        let Some(store) = self.active.as_ref() else {
            debug!("add ignored while logged out");
            return Ok(None);
        };
        if self.new_task.trim().is_empty() {
            return Ok(None);
        }

        let title = std::mem::take(&mut self.new_task);
        let key = store.add(&title).await?;
        Ok(Some(key))
    }

    /// Marks `task` done by removing it from the active store.
    ///
    /// Returns `false` when logged out or when the task is not displayed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::TaskStore`] when the delete fails.
    pub async fn done(&self, task: &Task) -> ViewResult<bool> {
        match self.active.as_ref() {
            Some(store) => Ok(store.remove(task).await?),
            None => Ok(false),
        }
    }

    /// Waits for the next session event and applies it.
    ///
    /// Returns `None` once the gateway is gone.
    ///
    /// # Errors
    ///
    /// Returns the error of [`TaskViewController::handle_event`].
    pub async fn next_event(&mut self) -> ViewResult<Option<SessionEvent>> {
        loop {
            match self.events.recv().await {
                Ok(event) => {
                    self.handle_event(&event).await?;
                    return Ok(Some(event));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "controller lagged behind session events");
                }
                Err(RecvError::Closed) => return Ok(None),
            }
        }
    }

    /// Applies a session event.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Session`] when the current user cannot be
    /// resolved and [`ViewError::TaskStore`] when the store cannot be opened.
    pub async fn handle_event(&mut self, event: &SessionEvent) -> ViewResult<()> {
        match event {
            SessionEvent::Login(_) => self.load_user_tasks().await,
            SessionEvent::Logout(_) => {
                self.clear();
                Ok(())
            }
        }
    }

    async fn load_user_tasks(&mut self) -> ViewResult<()> {
        let Some(user) = self.gateway.current_user().await? else {
            debug!("login event without a current user");
            return Ok(());
        };

        self.clear();
        let store = TaskStore::open(
            user,
            &self.settings.default_category,
            Arc::clone(&self.store),
            &self.settings.users_root,
        )
        .await?;
        info!(path = %store.path(), "task list bound");
        self.active = Some(store);
        self.new_task.clear();
        Ok(())
    }

    fn clear(&mut self) {
        if let Some(mut store) = self.active.take() {
            store.close();
            info!(path = %store.path(), "task list cleared");
        }
    }
}
