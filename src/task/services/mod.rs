//! Application services for task synchronization.

mod store;

pub use store::{TaskStore, TaskStoreError, TaskStoreResult};
