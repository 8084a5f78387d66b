//! Domain model for per-user task lists.
//!
//! Tasks live in the backing store under `<uid>/tasks/<category>`. The
//! domain covers path derivation, store-assigned keys and the record shapes
//! exchanged with the store.

mod error;
mod ids;
mod path;
mod record;
mod task;

pub use error::TaskDomainError;
pub use ids::ChildKey;
pub use path::{Category, StorePath, TaskPath};
pub use record::{NewTaskRecord, ServerTimestamp, StoredTaskRecord};
pub use task::Task;
