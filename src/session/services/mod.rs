//! Application services for session management.

mod gateway;
mod subscription;

pub use gateway::{DEFAULT_EVENT_CAPACITY, SessionError, SessionGateway, SessionResult};
pub use subscription::Subscription;
