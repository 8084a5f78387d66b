//! Given steps for task page BDD scenarios.

use super::world::{TaskPageWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a registered user "{email}" with password "{password}""#)]
fn registered_user(
    world: &mut TaskPageWorld,
    email: String,
    password: String,
) -> Result<(), eyre::Report> {
    let form = world.controller.form_mut();
    form.email = email;
    form.password = password;
    run_async(world.controller.register()).wrap_err("register user")?;
    Ok(())
}

#[given(r#"the user is logged in with password "{password}""#)]
fn user_logged_in(world: &mut TaskPageWorld, password: String) -> Result<(), eyre::Report> {
    world.login(password)?;
    match world.last_login.as_ref() {
        Some(Ok(_)) => Ok(()),
        other => Err(eyre::eyre!("expected a successful login, got {other:?}")),
    }
}

#[given(r#"the user has added "{title}""#)]
fn user_has_added(world: &mut TaskPageWorld, title: String) -> Result<(), eyre::Report> {
    world.add_task(title)
}
