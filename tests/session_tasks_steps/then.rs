//! Then steps for task page BDD scenarios.

use super::world::{TaskPageWorld, WAIT, run_async};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::then;
use taskpad::{
    session::{ports::AuthProviderError, services::SessionError},
    view::{ViewError, ViewState},
};

#[then(r#"the task list is bound to "{path}""#)]
fn task_list_bound_to(world: &TaskPageWorld, path: String) -> Result<(), eyre::Report> {
    let store = world
        .controller
        .task_store()
        .ok_or_else(|| eyre!("no task store bound"))?;
    if store.path().to_string() != path {
        return Err(eyre!("expected path {path}, found {}", store.path()));
    }
    Ok(())
}

#[then(r#"the displayed list shows "{title}""#)]
fn displayed_list_shows(world: &TaskPageWorld, title: String) -> Result<(), eyre::Report> {
    let mut binding = world
        .controller
        .binding()
        .ok_or_else(|| eyre!("no task list bound"))?;
    run_async(tokio::time::timeout(
        WAIT,
        binding.wait_for(|tasks| {
            tasks.len() == 1 && tasks.iter().all(|task| task.title() == title)
        }),
    ))
    .wrap_err("displayed list did not settle")?
    .wrap_err("binding closed")?;
    Ok(())
}

#[then("the store holds {count:usize} child at the task location")]
fn store_holds_children(world: &TaskPageWorld, count: usize) -> Result<(), eyre::Report> {
    let location = world
        .controller
        .task_store()
        .ok_or_else(|| eyre!("no task store bound"))?
        .location()
        .clone();
    let children = world
        .store
        .children(&location)
        .wrap_err("read store children")?;
    if children.len() != count {
        return Err(eyre!("expected {count} children, found {}", children.len()));
    }
    Ok(())
}

#[then("the displayed list is empty")]
fn displayed_list_empty(world: &TaskPageWorld) -> Result<(), eyre::Report> {
    let tasks = world.controller.tasks();
    if !tasks.is_empty() {
        return Err(eyre!("expected an empty list, found {tasks:?}"));
    }
    Ok(())
}

#[then("no task list is bound")]
fn no_task_list_bound(world: &TaskPageWorld) -> Result<(), eyre::Report> {
    if world.controller.state() != ViewState::LoggedOut || world.controller.binding().is_some() {
        return Err(eyre!("expected the controller to be logged out"));
    }
    Ok(())
}

#[then("login fails with invalid credentials")]
fn login_fails(world: &TaskPageWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_login
        .as_ref()
        .ok_or_else(|| eyre!("no login attempted"))?;
    if !matches!(
        result,
        Err(ViewError::Session(SessionError::Provider(
            AuthProviderError::InvalidCredentials
        )))
    ) {
        return Err(eyre!("expected invalid credentials, got {result:?}"));
    }
    Ok(())
}
