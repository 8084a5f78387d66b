//! Wire shapes of task records.

use serde::{Deserialize, Serialize};

/// Placeholder the backing store replaces with its own clock reading.
///
/// Serializes as `{".sv": "timestamp"}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTimestamp {
    #[serde(rename = ".sv")]
    value: ServerValue,
}

impl ServerTimestamp {
    /// Creates the timestamp placeholder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: ServerValue::Timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ServerValue {
    #[default]
    Timestamp,
}

/// Record written when a task is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTaskRecord {
    /// Task title.
    pub title: String,
    /// Creation time, assigned by the store.
    pub time: ServerTimestamp,
}

impl NewTaskRecord {
    /// Creates a record with a server-assigned timestamp.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            time: ServerTimestamp::new(),
        }
    }
}

/// Record as stored, once the timestamp has been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredTaskRecord {
    /// Task title.
    pub title: String,
    /// Milliseconds since the Unix epoch.
    pub time: i64,
}
