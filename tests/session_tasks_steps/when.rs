//! When steps for task page BDD scenarios.

use super::world::{TaskPageWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the user logs in with password "{password}""#)]
fn user_logs_in(world: &mut TaskPageWorld, password: String) -> Result<(), eyre::Report> {
    world.login(password)
}

#[when(r#"the user types "{title}" and presses Enter"#)]
fn user_types_and_confirms(world: &mut TaskPageWorld, title: String) -> Result<(), eyre::Report> {
    world.add_task(title)
}

#[when(r#"the user marks "{title}" as done"#)]
fn user_marks_done(world: &mut TaskPageWorld, title: String) -> Result<(), eyre::Report> {
    let task = world
        .controller
        .tasks()
        .into_iter()
        .find(|task| task.title() == title)
        .ok_or_else(|| eyre::eyre!("no displayed task titled {title}"))?;
    let removed = run_async(world.controller.done(&task)).wrap_err("mark task done")?;
    if !removed {
        return Err(eyre::eyre!("task {title} was not removed"));
    }
    Ok(())
}

#[when("the user logs out")]
fn user_logs_out(world: &mut TaskPageWorld) -> Result<(), eyre::Report> {
    run_async(world.controller.logout()).wrap_err("logout")?;
    run_async(world.controller.next_event()).wrap_err("apply logout event")?;
    Ok(())
}
