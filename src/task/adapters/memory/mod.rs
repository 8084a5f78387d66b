//! In-memory task adapters.

mod push_key;
mod store;

pub use store::InMemoryRealtimeStore;
