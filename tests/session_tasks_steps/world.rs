//! Shared world state for task page BDD scenarios.

use std::sync::Arc;
use std::time::Duration;

use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use rstest::fixture;
use taskpad::{
    config::{DEFAULT_CONFIRM_KEY, Settings},
    session::{adapters::memory::InMemoryAuthProvider, domain::User, services::SessionGateway},
    task::adapters::memory::InMemoryRealtimeStore,
    view::{TaskViewController, ViewError},
};

/// Store type used by the BDD world.
pub type TestStore = InMemoryRealtimeStore<DefaultClock>;

/// Controller type used by the BDD world.
pub type TestController = TaskViewController<InMemoryAuthProvider, TestStore>;

/// How long steps wait for asynchronous echoes.
pub const WAIT: Duration = Duration::from_secs(2);

/// Scenario world for task page behaviour tests.
pub struct TaskPageWorld {
    pub controller: TestController,
    pub store: Arc<TestStore>,
    pub last_login: Option<Result<User, ViewError>>,
}

impl TaskPageWorld {
    /// Creates a logged-out world backed by in-memory adapters.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryRealtimeStore::new(DefaultClock));
        let settings = Settings::default();
        let gateway = Arc::new(SessionGateway::with_settings(
            Arc::new(InMemoryAuthProvider::new()),
            &settings,
        ));
        let controller = TaskViewController::new(gateway, Arc::clone(&store), settings);
        Self {
            controller,
            store,
            last_login: None,
        }
    }

    /// Logs in with the form's email and `password`, then applies the
    /// resulting session event when login succeeds.
    pub fn login(&mut self, password: String) -> Result<(), eyre::Report> {
        self.controller.form_mut().password = password;
        let result = run_async(self.controller.login());
        if result.is_ok() {
            run_async(self.controller.next_event()).wrap_err("apply login event")?;
        }
        self.last_login = Some(result);
        Ok(())
    }

    /// Types `title` into the new-task field and confirms it.
    pub fn add_task(&mut self, title: String) -> Result<(), eyre::Report> {
        self.controller.set_new_task(title);
        let key = run_async(self.controller.add(DEFAULT_CONFIRM_KEY))
            .wrap_err("add task")?
            .ok_or_else(|| eyre!("confirmation key did not add a task"))?;
        let store = self
            .controller
            .task_store()
            .ok_or_else(|| eyre!("no task store bound"))?;
        run_async(tokio::time::timeout(WAIT, store.wait_for(&key)))
            .wrap_err("task echo timed out")?
            .wrap_err("wait for task echo")?;
        Ok(())
    }
}

impl Default for TaskPageWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskPageWorld {
    TaskPageWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
