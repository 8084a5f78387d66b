//! Domain model for user sessions.
//!
//! Users, credentials, and the login/logout notifications exchanged between
//! the session gateway and its subscribers.

mod credentials;
mod error;
mod event;
mod user;

pub use credentials::{AuthMethod, Credentials, Email, Password};
pub use error::SessionDomainError;
pub use event::{SessionEvent, SessionEventKind};
pub use user::{User, UserId};
