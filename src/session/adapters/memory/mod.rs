//! In-memory session adapters.

mod auth;

pub use auth::InMemoryAuthProvider;
