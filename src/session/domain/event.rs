//! Login and logout notifications.

use super::User;

/// Kind of a [`SessionEvent`], used to filter subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    /// A user logged in.
    Login,
    /// The session ended.
    Logout,
}

/// Notification published by the session gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user logged in.
    Login(User),
    /// The session ended. Carries the user whose session ended, if known.
    Logout(Option<User>),
}

impl SessionEvent {
    /// Returns the event kind.
    #[must_use]
    pub const fn kind(&self) -> SessionEventKind {
        match self {
            Self::Login(_) => SessionEventKind::Login,
            Self::Logout(_) => SessionEventKind::Logout,
        }
    }

    /// Returns the user payload, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Login(user) => Some(user),
            Self::Logout(user) => user.as_ref(),
        }
    }
}
