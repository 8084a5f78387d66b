//! Task store: one user's tasks in one category, kept in sync with the
//! backing store.

use crate::session::domain::User;
use crate::task::{
    domain::{Category, ChildKey, NewTaskRecord, StorePath, Task, TaskDomainError, TaskPath},
    ports::{ChildWatch, RealtimeStore, RealtimeStoreError},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Service-level errors for task store operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The backing store rejected the request.
    #[error(transparent)]
    Store(#[from] RealtimeStoreError),
    /// The store has been closed and no longer observes changes.
    #[error("task store for {0} is closed")]
    Closed(String),
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Mirrors the children of `<uid>/tasks/<category>` into an ordered list.
///
/// The list grows only through child-added notifications, in arrival order,
/// and shrinks only through [`TaskStore::remove`]. Adds are written through
/// to the backing store and become visible when the store echoes them back.
pub struct TaskStore<S>
where
    S: RealtimeStore + 'static,
{
    user: User,
    path: TaskPath,
    location: StorePath,
    store: Arc<S>,
    tasks: Arc<watch::Sender<Vec<Task>>>,
    listener: Option<JoinHandle<()>>,
}

impl<S> TaskStore<S>
where
    S: RealtimeStore + 'static,
{
    /// Opens the task list of `user` in `category` and starts listening for
    /// added children under `users_root/<uid>/tasks/<category>`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Store`] when the watch cannot be started.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub async fn open(
        user: User,
        category: &Category,
        store: Arc<S>,
        users_root: &StorePath,
    ) -> TaskStoreResult<Self> {
        let path = TaskPath::new(user.uid(), category);
        let location = users_root.join(path.as_store_path());
        let watch = store.watch_child_added(&location).await?;

        let (sender, _) = watch::channel(Vec::new());
        let tasks = Arc::new(sender);
        let listener = tokio::spawn(listen(watch, Arc::clone(&tasks), location.clone()));
        info!(uid = %user.uid(), location = %location, "task store opened");

        Ok(Self {
            user,
            path,
            location,
            store,
            tasks,
            listener: Some(listener),
        })
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Returns the path relative to the users root: `<uid>/tasks/<category>`.
    #[must_use]
    pub const fn path(&self) -> &TaskPath {
        &self.path
    }

    /// Returns the absolute location in the backing store.
    #[must_use]
    pub const fn location(&self) -> &StorePath {
        &self.location
    }

    /// Returns a snapshot of the current task list.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    /// Returns a receiver that observes every change to the task list.
    #[must_use]
    pub fn binding(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks.subscribe()
    }

    /// Returns `true` until [`TaskStore::close`] is called.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.listener.is_some()
    }

    /// Writes a new task with a server-assigned timestamp and returns its
    /// key.
    ///
    /// The task is not appended locally; it appears once the store echoes
    /// the addition. Use [`TaskStore::wait_for`] to observe it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title and
    /// [`TaskStoreError::Store`] when the write fails.
    pub async fn add(&self, title: &str) -> TaskStoreResult<ChildKey> {
        if title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle.into());
        }
        let record = serde_json::to_value(NewTaskRecord::new(title))
            .map_err(|err| RealtimeStoreError::Serialization(err.to_string()))?;
        let key = self.store.push(&self.location, record).await?;
        debug!(location = %self.location, key = %key, "task added");
        Ok(key)
    }

    /// Removes `task` locally and from the backing store.
    ///
    /// Returns `false` without touching the backing store when the task is
    /// not in the list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Store`] when the delete fails. The local
    /// removal is not rolled back.
    pub async fn remove(&self, task: &Task) -> TaskStoreResult<bool> {
        let removed = self.tasks.send_if_modified(|tasks| {
            tasks
                .iter()
                .position(|candidate| candidate == task)
                .map(|index| tasks.remove(index))
                .is_some()
        });
        if !removed {
            debug!(location = %self.location, key = %task.key(), "task not in list");
            return Ok(false);
        }

        self.store.remove(&self.location, task.key()).await?;
        debug!(location = %self.location, key = %task.key(), "task removed");
        Ok(true)
    }

    /// Waits until a task with `key` has been observed and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Closed`] when the store is closed.
    pub async fn wait_for(&self, key: &ChildKey) -> TaskStoreResult<Task> {
        if !self.is_open() {
            return Err(TaskStoreError::Closed(self.location.to_string()));
        }
        let mut receiver = self.tasks.subscribe();
        let tasks = receiver
            .wait_for(|tasks| tasks.iter().any(|task| task.key() == key))
            .await
            .map_err(|_| TaskStoreError::Closed(self.location.to_string()))?;
        tasks
            .iter()
            .find(|task| task.key() == key)
            .cloned()
            .ok_or_else(|| TaskStoreError::Closed(self.location.to_string()))
    }

    /// Stops listening for changes. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            info!(uid = %self.user.uid(), location = %self.location, "task store closed");
        }
    }
}

impl<S> Drop for TaskStore<S>
where
    S: RealtimeStore + 'static,
{
    fn drop(&mut self) {
        self.close();
    }
}

async fn listen(
    mut watch: ChildWatch,
    tasks: Arc<watch::Sender<Vec<Task>>>,
    location: StorePath,
) {
    while let Some(snapshot) = watch.next().await {
        match Task::from_value(snapshot.key, &snapshot.value) {
            Ok(task) => tasks.send_modify(|list| list.push(task)),
            Err(err) => warn!(location = %location, error = %err, "skipping child"),
        }
    }
    debug!(location = %location, "child watch ended");
}
