//! Port contracts for task synchronization.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod store;

pub use store::{
    ChildSnapshot, ChildWatch, RealtimeStore, RealtimeStoreError, RealtimeStoreResult,
};
