//! Task entity mirrored from the backing store.

use super::{ChildKey, StoredTaskRecord, TaskDomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A to-do item observed under a task path.
///
/// Two tasks are equal only when key, title and timestamp all match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    key: ChildKey,
    title: String,
    created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task from its parts.
    #[must_use]
    pub const fn new(key: ChildKey, title: String, created_at: DateTime<Utc>) -> Self {
        Self {
            key,
            title,
            created_at,
        }
    }

    /// Decodes a task from a stored child value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MalformedRecord`] when the value lacks a
    /// string `title` or integer `time`, and
    /// [`TaskDomainError::InvalidTimestamp`] when `time` is out of range.
    pub fn from_value(key: ChildKey, value: &Value) -> Result<Self, TaskDomainError> {
        let record = StoredTaskRecord::deserialize(value).map_err(|err| {
            TaskDomainError::MalformedRecord {
                key: key.as_str().to_owned(),
                reason: err.to_string(),
            }
        })?;
        let created_at = DateTime::from_timestamp_millis(record.time)
            .ok_or(TaskDomainError::InvalidTimestamp(record.time))?;
        Ok(Self::new(key, record.title, created_at))
    }

    /// Returns the store-assigned key.
    #[must_use]
    pub const fn key(&self) -> &ChildKey {
        &self.key
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the server-assigned creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
