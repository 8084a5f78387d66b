//! Realtime store port: hierarchical key tree with child-added notifications.

use crate::task::domain::{ChildKey, StorePath};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Result type for realtime store operations.
pub type RealtimeStoreResult<T> = Result<T, RealtimeStoreError>;

/// A child entry as delivered by a watch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSnapshot {
    /// Store-assigned key of the child.
    pub key: ChildKey,
    /// Stored value with server values already resolved.
    pub value: Value,
}

/// Stream of child-added notifications for one path.
///
/// Dropping the watch unregisters it from the store.
#[derive(Debug)]
pub struct ChildWatch {
    receiver: mpsc::UnboundedReceiver<ChildSnapshot>,
}

impl ChildWatch {
    /// Wraps the receiving half of a notification channel.
    #[must_use]
    pub const fn new(receiver: mpsc::UnboundedReceiver<ChildSnapshot>) -> Self {
        Self { receiver }
    }

    /// Waits for the next added child. Returns `None` once the store stops
    /// delivering.
    pub async fn next(&mut self) -> Option<ChildSnapshot> {
        self.receiver.recv().await
    }
}

/// Contract of the backing realtime key-value tree.
#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Adds `value` as a new child of `path` under a store-assigned key.
    ///
    /// Server value placeholders inside `value` are resolved by the store.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeStoreError::PermissionDenied`] when writes to `path`
    /// are rejected or [`RealtimeStoreError::Unavailable`] when the store
    /// cannot be reached.
    async fn push(&self, path: &StorePath, value: Value) -> RealtimeStoreResult<ChildKey>;

    /// Deletes the child `key` of `path`. Deleting a missing child succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeStoreError::PermissionDenied`] or
    /// [`RealtimeStoreError::Unavailable`] as for [`RealtimeStore::push`].
    async fn remove(&self, path: &StorePath, key: &ChildKey) -> RealtimeStoreResult<()>;

    /// Starts watching children added under `path`.
    ///
    /// Existing children are delivered first, in insertion order, followed
    /// by children added afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeStoreError::Unavailable`] when the store cannot be
    /// reached.
    async fn watch_child_added(&self, path: &StorePath) -> RealtimeStoreResult<ChildWatch>;
}

/// Errors returned by realtime store implementations.
#[derive(Debug, Clone, Error)]
pub enum RealtimeStoreError {
    /// The store could not be reached.
    #[error("realtime store unavailable")]
    Unavailable,

    /// The store rejected access to the path.
    #[error("permission denied at {0}")]
    PermissionDenied(StorePath),

    /// A value could not be encoded for the store.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RealtimeStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
