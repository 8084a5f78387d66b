//! Storage paths and the per-user task path convention.

use super::TaskDomainError;
use crate::session::domain::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

const SEPARATOR: char = '/';
const TASKS_SEGMENT: &str = "tasks";
const INCOMPLETE: &str = "incomplete";

/// Location in the backing store's key tree.
///
/// Held as non-empty segments and rendered joined by `/`. The empty path is
/// the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorePath(Vec<String>);

impl StorePath {
    /// Returns the root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Parses a `/`-separated path. Leading and trailing separators are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPathSegment`] when an inner segment
    /// is empty or blank.
    pub fn parse(value: &str) -> Result<Self, TaskDomainError> {
        let trimmed = value.trim().trim_matches(SEPARATOR);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed
            .split(SEPARATOR)
            .try_fold(Self::root(), |path, segment| path.child(segment))
    }

    /// Returns this path extended by one segment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPathSegment`] when the segment is
    /// blank or contains a `/`.
    pub fn child(&self, segment: &str) -> Result<Self, TaskDomainError> {
        if segment.trim().is_empty() || segment.contains(SEPARATOR) {
            return Err(TaskDomainError::InvalidPathSegment(segment.to_owned()));
        }
        let mut segments = self.0.clone();
        segments.push(segment.to_owned());
        Ok(Self(segments))
    }

    /// Returns this path followed by every segment of `other`.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    /// Returns `true` when `prefix` is this path or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Label partitioning a user's tasks, such as `incomplete`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Creates a validated category.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidCategory`] when the label is blank
    /// or contains a `/`.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.contains(SEPARATOR) {
            return Err(TaskDomainError::InvalidCategory(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// The category holding tasks not yet done.
    #[must_use]
    pub fn incomplete() -> Self {
        Self(INCOMPLETE.to_owned())
    }

    /// Returns the label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::incomplete()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of one user's tasks in one category: `<uid>/tasks/<category>`.
///
/// Relative to the users root of the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskPath {
    uid: UserId,
    category: Category,
    path: StorePath,
}

impl TaskPath {
    /// Derives the task path for a user and category.
    #[must_use]
    pub fn new(uid: &UserId, category: &Category) -> Self {
        // Both values are validated to be non-blank and free of separators.
        let path = StorePath(vec![
            uid.as_str().to_owned(),
            TASKS_SEGMENT.to_owned(),
            category.as_str().to_owned(),
        ]);
        Self {
            uid: uid.clone(),
            category: category.clone(),
            path,
        }
    }

    /// Returns the owning user's identifier.
    #[must_use]
    pub const fn uid(&self) -> &UserId {
        &self.uid
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    /// Returns the path as store segments.
    #[must_use]
    pub const fn as_store_path(&self) -> &StorePath {
        &self.path
    }
}

impl fmt::Display for TaskPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.fmt(f)
    }
}
