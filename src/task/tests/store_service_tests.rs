//! Task store orchestration tests.

use std::sync::Arc;
use std::time::Duration;

use crate::session::domain::{AuthMethod, Email, User, UserId};
use crate::task::{
    adapters::memory::InMemoryRealtimeStore,
    domain::{Category, ChildKey, StorePath, Task, TaskDomainError},
    ports::{
        ChildSnapshot, ChildWatch, RealtimeStore, RealtimeStoreError, RealtimeStoreResult,
    },
    services::{TaskStore, TaskStoreError},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use mockall::mock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

mock! {
    pub Store {}

    #[async_trait]
    impl RealtimeStore for Store {
        async fn push(&self, path: &StorePath, value: Value) -> RealtimeStoreResult<ChildKey>;
        async fn remove(&self, path: &StorePath, key: &ChildKey) -> RealtimeStoreResult<()>;
        async fn watch_child_added(&self, path: &StorePath) -> RealtimeStoreResult<ChildWatch>;
    }
}

const WAIT: Duration = Duration::from_secs(2);

type MemoryStore = InMemoryRealtimeStore<DefaultClock>;

#[fixture]
fn user() -> User {
    User::new(
        UserId::new("abc123").expect("valid uid"),
        Email::new("alice@example.com").expect("valid email"),
        AuthMethod::Password,
    )
}

#[fixture]
fn users_root() -> StorePath {
    StorePath::parse("users").expect("valid path")
}

fn key(value: &str) -> ChildKey {
    ChildKey::new(value).expect("valid key")
}

fn snapshot(key_value: &str, title: &str) -> ChildSnapshot {
    ChildSnapshot {
        key: key(key_value),
        value: json!({ "title": title, "time": 1_400_000_000_000_i64 }),
    }
}

/// Mock store whose watch is fed by the returned sender.
fn mock_with_feed() -> (MockStore, mpsc::UnboundedSender<ChildSnapshot>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let mut store = MockStore::new();
    store
        .expect_watch_child_added()
        .times(1)
        .return_once(move |_| Ok(ChildWatch::new(receiver)));
    (store, sender)
}

async fn wait_for_len<S: RealtimeStore + 'static>(store: &TaskStore<S>, len: usize) -> Vec<Task> {
    let mut binding = store.binding();
    let tasks = timeout(WAIT, binding.wait_for(|tasks| tasks.len() == len))
        .await
        .expect("task list should reach expected length")
        .expect("binding open");
    tasks.clone()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_derives_path_and_location(user: User, users_root: StorePath) {
    let store = Arc::new(MemoryStore::new(DefaultClock));

    let tasks = TaskStore::open(user, &Category::incomplete(), store, &users_root)
        .await
        .expect("open should succeed");

    assert_eq!(tasks.path().to_string(), "abc123/tasks/incomplete");
    assert_eq!(tasks.location().to_string(), "users/abc123/tasks/incomplete");
    assert!(tasks.is_open());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_is_empty_until_first_child_added(user: User, users_root: StorePath) {
    let (mock, feed) = mock_with_feed();
    let tasks = TaskStore::open(user, &Category::incomplete(), Arc::new(mock), &users_root)
        .await
        .expect("open should succeed");

    assert!(tasks.tasks().is_empty());

    feed.send(snapshot("-Ja", "Buy milk")).expect("feed open");
    let observed = wait_for_len(&tasks, 1).await;
    assert_eq!(observed.first().map(Task::title), Some("Buy milk"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn children_are_appended_in_arrival_order_without_dedup(
    user: User,
    users_root: StorePath,
) {
    let (mock, feed) = mock_with_feed();
    let tasks = TaskStore::open(user, &Category::incomplete(), Arc::new(mock), &users_root)
        .await
        .expect("open should succeed");

    feed.send(snapshot("-Jb", "second")).expect("feed open");
    feed.send(snapshot("-Ja", "first")).expect("feed open");
    feed.send(snapshot("-Jb", "second")).expect("feed open");

    let observed = wait_for_len(&tasks, 3).await;
    let titles: Vec<&str> = observed.iter().map(Task::title).collect();
    assert_eq!(titles, ["second", "first", "second"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_children_are_skipped(user: User, users_root: StorePath) {
    let (mock, feed) = mock_with_feed();
    let tasks = TaskStore::open(user, &Category::incomplete(), Arc::new(mock), &users_root)
        .await
        .expect("open should succeed");

    feed.send(ChildSnapshot {
        key: key("-Jx"),
        value: json!({ "unexpected": true }),
    })
    .expect("feed open");
    feed.send(snapshot("-Jy", "valid")).expect("feed open");

    let observed = wait_for_len(&tasks, 1).await;
    assert_eq!(observed.first().map(|task| task.key().as_str()), Some("-Jy"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_writes_title_and_server_timestamp_without_local_append(
    user: User,
    users_root: StorePath,
) {
    let (mut mock, _feed) = mock_with_feed();
    mock.expect_push()
        .withf(|path, value| {
            path.to_string() == "users/abc123/tasks/incomplete"
                && *value == json!({ "title": "Buy milk", "time": { ".sv": "timestamp" } })
        })
        .times(1)
        .returning(|_, _| Ok(key("-Jnew")));
    let tasks = TaskStore::open(user, &Category::incomplete(), Arc::new(mock), &users_root)
        .await
        .expect("open should succeed");

    let added = tasks.add("Buy milk").await.expect("add should succeed");

    assert_eq!(added, key("-Jnew"));
    assert!(tasks.tasks().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_rejects_blank_title(user: User, users_root: StorePath) {
    let (mut mock, _feed) = mock_with_feed();
    mock.expect_push().times(0);
    let tasks = TaskStore::open(user, &Category::incomplete(), Arc::new(mock), &users_root)
        .await
        .expect("open should succeed");

    let result = tasks.add("   ").await;

    assert!(matches!(
        result,
        Err(TaskStoreError::Domain(TaskDomainError::EmptyTitle))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_present_task_issues_exactly_one_delete(user: User, users_root: StorePath) {
    let (mut mock, feed) = mock_with_feed();
    mock.expect_remove()
        .withf(|_, removed| removed.as_str() == "-Ja")
        .times(1)
        .returning(|_, _| Ok(()));
    let tasks = TaskStore::open(user, &Category::incomplete(), Arc::new(mock), &users_root)
        .await
        .expect("open should succeed");
    feed.send(snapshot("-Ja", "Buy milk")).expect("feed open");
    feed.send(snapshot("-Jb", "Walk dog")).expect("feed open");
    let observed = wait_for_len(&tasks, 2).await;
    let target = observed.first().cloned().expect("first task");

    let removed = tasks.remove(&target).await.expect("remove should succeed");

    assert!(removed);
    let remaining = tasks.tasks();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining.first().map(Task::title), Some("Walk dog"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_absent_task_is_a_no_op(user: User, users_root: StorePath) {
    let (mut mock, feed) = mock_with_feed();
    mock.expect_remove().times(0);
    let tasks = TaskStore::open(user, &Category::incomplete(), Arc::new(mock), &users_root)
        .await
        .expect("open should succeed");
    feed.send(snapshot("-Ja", "Buy milk")).expect("feed open");
    wait_for_len(&tasks, 1).await;
    let stranger = Task::from_value(key("-Jz"), &json!({ "title": "Other", "time": 1 }))
        .expect("valid task");

    let removed = tasks.remove(&stranger).await.expect("remove should succeed");

    assert!(!removed);
    assert_eq!(tasks.tasks().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_failure_is_returned_after_local_removal(user: User, users_root: StorePath) {
    let (mut mock, feed) = mock_with_feed();
    mock.expect_remove()
        .times(1)
        .returning(|_, _| Err(RealtimeStoreError::Unavailable));
    let tasks = TaskStore::open(user, &Category::incomplete(), Arc::new(mock), &users_root)
        .await
        .expect("open should succeed");
    feed.send(snapshot("-Ja", "Buy milk")).expect("feed open");
    let target = wait_for_len(&tasks, 1)
        .await
        .first()
        .cloned()
        .expect("one task");

    let result = tasks.remove(&target).await;

    assert!(matches!(
        result,
        Err(TaskStoreError::Store(RealtimeStoreError::Unavailable))
    ));
    assert!(tasks.tasks().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn added_task_arrives_through_echo(user: User, users_root: StorePath) {
    let store = Arc::new(MemoryStore::new(DefaultClock));
    let tasks = TaskStore::open(user, &Category::incomplete(), store, &users_root)
        .await
        .expect("open should succeed");

    let added = tasks.add("Buy milk").await.expect("add should succeed");
    let task = timeout(WAIT, tasks.wait_for(&added))
        .await
        .expect("echo should arrive")
        .expect("store open");

    assert_eq!(task.title(), "Buy milk");
    assert_eq!(task.key(), &added);
    assert_eq!(tasks.tasks(), vec![task]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn existing_children_are_loaded_on_open(user: User, users_root: StorePath) {
    let store = Arc::new(MemoryStore::new(DefaultClock));
    let location = StorePath::parse("users/abc123/tasks/incomplete").expect("valid path");
    for title in ["one", "two"] {
        store
            .push(&location, json!({ "title": title, "time": { ".sv": "timestamp" } }))
            .await
            .expect("seed push");
    }

    let tasks = TaskStore::open(user, &Category::incomplete(), store, &users_root)
        .await
        .expect("open should succeed");

    let observed = wait_for_len(&tasks, 2).await;
    let titles: Vec<&str> = observed.iter().map(Task::title).collect();
    assert_eq!(titles, ["one", "two"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn categories_are_isolated(user: User, users_root: StorePath) {
    let store = Arc::new(MemoryStore::new(DefaultClock));
    let completed = Category::new("completed").expect("valid category");
    let incomplete = TaskStore::open(
        user.clone(),
        &Category::incomplete(),
        Arc::clone(&store),
        &users_root,
    )
    .await
    .expect("open should succeed");
    let done = TaskStore::open(user, &completed, store, &users_root)
        .await
        .expect("open should succeed");

    let key = done.add("Shipped").await.expect("add should succeed");
    timeout(WAIT, done.wait_for(&key))
        .await
        .expect("echo should arrive")
        .expect("store open");

    assert!(incomplete.tasks().is_empty());
    assert_eq!(done.path().to_string(), "abc123/tasks/completed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_store_stops_observing(user: User, users_root: StorePath) {
    let store = Arc::new(MemoryStore::new(DefaultClock));
    let mut tasks = TaskStore::open(
        user,
        &Category::incomplete(),
        Arc::clone(&store),
        &users_root,
    )
    .await
    .expect("open should succeed");
    let location = tasks.location().clone();

    tasks.close();
    tasks.close();
    store
        .push(&location, json!({ "title": "late", "time": 1 }))
        .await
        .expect("push should succeed");
    sleep(Duration::from_millis(50)).await;

    assert!(!tasks.is_open());
    assert!(tasks.tasks().is_empty());
    assert!(matches!(
        tasks.wait_for(&key("-Jnever")).await,
        Err(TaskStoreError::Closed(_))
    ));
    assert_eq!(store.watch_count(&location).expect("count"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn permission_denied_is_surfaced(user: User, users_root: StorePath) {
    let store = Arc::new(MemoryStore::new(DefaultClock));
    store.deny(users_root.clone()).expect("deny");
    let tasks = TaskStore::open(user, &Category::incomplete(), store, &users_root)
        .await
        .expect("watching is still allowed");

    let result = tasks.add("Buy milk").await;

    assert!(matches!(
        result,
        Err(TaskStoreError::Store(RealtimeStoreError::PermissionDenied(_)))
    ));
}
