//! In-memory realtime store for tests and offline use.

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::push_key::PushKeyGenerator;
use crate::task::{
    domain::{ChildKey, StorePath},
    ports::{ChildSnapshot, ChildWatch, RealtimeStore, RealtimeStoreError, RealtimeStoreResult},
};

const SERVER_VALUE_FIELD: &str = ".sv";
const SERVER_TIMESTAMP: &str = "timestamp";

/// Thread-safe in-memory key tree with child-added notifications.
///
/// Children are kept per parent path in insertion order. Watches receive
/// the existing children on registration, then every later addition.
#[derive(Debug, Clone)]
pub struct InMemoryRealtimeStore<C: Clock + Send + Sync> {
    state: Arc<RwLock<TreeState>>,
    clock: C,
}

#[derive(Debug)]
struct TreeState {
    children: HashMap<StorePath, Vec<ChildSnapshot>>,
    watchers: HashMap<StorePath, Vec<mpsc::UnboundedSender<ChildSnapshot>>>,
    keys: PushKeyGenerator,
    denied: Vec<StorePath>,
    available: bool,
}

impl Default for TreeState {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            watchers: HashMap::new(),
            keys: PushKeyGenerator::default(),
            denied: Vec::new(),
            available: true,
        }
    }
}

impl TreeState {
    fn check_access(&self, path: &StorePath) -> RealtimeStoreResult<()> {
        if !self.available {
            return Err(RealtimeStoreError::Unavailable);
        }
        if self.denied.iter().any(|prefix| path.starts_with(prefix)) {
            return Err(RealtimeStoreError::PermissionDenied(path.clone()));
        }
        Ok(())
    }

    /// Delivers `snapshot` to every live watch of `path`, dropping watches
    /// whose receiver is gone.
    fn notify(&mut self, path: &StorePath, snapshot: &ChildSnapshot) {
        if let Some(senders) = self.watchers.get_mut(path) {
            senders.retain(|sender| sender.send(snapshot.clone()).is_ok());
            if senders.is_empty() {
                self.watchers.remove(path);
            }
        }
    }
}

impl<C: Clock + Send + Sync> InMemoryRealtimeStore<C> {
    /// Creates an empty store whose server timestamps come from `clock`.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            state: Arc::new(RwLock::new(TreeState::default())),
            clock,
        }
    }

    /// Returns the children of `path` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeStoreError::Persistence`] when the state lock is
    /// poisoned.
    pub fn children(&self, path: &StorePath) -> RealtimeStoreResult<Vec<ChildSnapshot>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.children.get(path).cloned().unwrap_or_default())
    }

    /// Returns the number of live watches on `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeStoreError::Persistence`] when the state lock is
    /// poisoned.
    pub fn watch_count(&self, path: &StorePath) -> RealtimeStoreResult<usize> {
        let mut state = self.state.write().map_err(poisoned)?;
        let count = state.watchers.get_mut(path).map_or(0, |senders| {
            senders.retain(|sender| !sender.is_closed());
            senders.len()
        });
        Ok(count)
    }

    /// Simulates the store going offline (`false`) or coming back.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeStoreError::Persistence`] when the state lock is
    /// poisoned.
    pub fn set_available(&self, available: bool) -> RealtimeStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.available = available;
        Ok(())
    }

    /// Rejects every later write under `prefix` with
    /// [`RealtimeStoreError::PermissionDenied`].
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeStoreError::Persistence`] when the state lock is
    /// poisoned.
    pub fn deny(&self, prefix: StorePath) -> RealtimeStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.denied.push(prefix);
        Ok(())
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> RealtimeStoreError {
    RealtimeStoreError::persistence(std::io::Error::other(err.to_string()))
}

/// Replaces every `{".sv": "timestamp"}` placeholder with `now_millis`.
fn resolve_server_values(value: Value, now_millis: i64) -> Value {
    match value {
        Value::Object(map) if is_server_timestamp(&map) => Value::from(now_millis),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(field, nested)| (field, resolve_server_values(nested, now_millis)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|nested| resolve_server_values(nested, now_millis))
                .collect(),
        ),
        other => other,
    }
}

fn is_server_timestamp(map: &Map<String, Value>) -> bool {
    map.len() == 1
        && map
            .get(SERVER_VALUE_FIELD)
            .and_then(Value::as_str)
            .is_some_and(|kind| kind == SERVER_TIMESTAMP)
}

#[async_trait]
impl<C: Clock + Send + Sync> RealtimeStore for InMemoryRealtimeStore<C> {
    async fn push(&self, path: &StorePath, value: Value) -> RealtimeStoreResult<ChildKey> {
        let now = self.clock.utc();
        let mut state = self.state.write().map_err(poisoned)?;
        state.check_access(path)?;

        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let key = state
            .keys
            .next_key(millis, Uuid::new_v4().as_bytes())
            .map_err(RealtimeStoreError::persistence)?;
        let snapshot = ChildSnapshot {
            key: key.clone(),
            value: resolve_server_values(value, now.timestamp_millis()),
        };

        state
            .children
            .entry(path.clone())
            .or_default()
            .push(snapshot.clone());
        state.notify(path, &snapshot);
        Ok(key)
    }

    async fn remove(&self, path: &StorePath, key: &ChildKey) -> RealtimeStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.check_access(path)?;
        if let Some(children) = state.children.get_mut(path) {
            children.retain(|child| child.key != *key);
            if children.is_empty() {
                state.children.remove(path);
            }
        }
        Ok(())
    }

    async fn watch_child_added(&self, path: &StorePath) -> RealtimeStoreResult<ChildWatch> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.available {
            return Err(RealtimeStoreError::Unavailable);
        }

        // Replay and registration happen under one lock so no addition can
        // fall between them.
        let (sender, receiver) = mpsc::unbounded_channel();
        for child in state.children.get(path).into_iter().flatten() {
            if sender.send(child.clone()).is_err() {
                break;
            }
        }
        state.watchers.entry(path.clone()).or_default().push(sender);
        Ok(ChildWatch::new(receiver))
    }
}
