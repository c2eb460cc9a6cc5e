//! Then steps for task engine BDD scenarios.

use super::world::{QUIET_PERIOD, TaskEngineWorld, run_async};
use eyre::{WrapErr, ensure, eyre};
use rstest_bdd_macros::then;
use taskmind::task::{
    commands::CommandError,
    domain::{Task, TaskId, TaskStatus, parse_due_date},
    services::EngineError,
};

fn find_task<'a>(world: &'a TaskEngineWorld, id: &str) -> Result<&'a Task, eyre::Report> {
    let task_id = TaskId::new(id)?;
    world
        .engine
        .list()
        .get(&task_id)
        .ok_or_else(|| eyre!("task {id} is not in the list"))
}

fn last_command_error(world: &TaskEngineWorld) -> Result<&CommandError, eyre::Report> {
    match world.last_action_result.as_ref() {
        Some(Err(EngineError::Command(err))) => Ok(err),
        other => Err(eyre!("expected a rejected command, got {other:?}")),
    }
}

#[then(r#"task "{id}" is due "{due}""#)]
fn task_is_due(world: &mut TaskEngineWorld, id: String, due: String) -> Result<(), eyre::Report> {
    let expected = parse_due_date(&due).wrap_err("parse expected date")?;
    let task = find_task(world, &id)?;
    ensure!(
        task.due_date() == expected,
        "task {id} is due {}, expected {expected}",
        task.due_date()
    );
    Ok(())
}

#[then(r#"task "{id}" is "{status}""#)]
fn task_has_status(
    world: &mut TaskEngineWorld,
    id: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())?;
    let task = find_task(world, &id)?;
    ensure!(
        task.status() == expected,
        "task {id} is {}, expected {expected}",
        task.status()
    );
    Ok(())
}

#[then(r#"the visible order is "{order}""#)]
fn visible_order(world: &mut TaskEngineWorld, order: String) -> Result<(), eyre::Report> {
    let expected: Vec<&str> = order.split(',').map(str::trim).collect();
    let visible = world.engine.visible_tasks();
    let actual: Vec<&str> = visible.iter().map(|task| task.id().as_str()).collect();
    ensure!(actual == expected, "visible order {actual:?}, expected {expected:?}");
    Ok(())
}

#[then("after the quiet period the remote store save count is {count:usize}")]
fn save_count(world: &mut TaskEngineWorld, count: usize) -> Result<(), eyre::Report> {
    run_async(tokio::time::sleep(QUIET_PERIOD * 5));
    let saves = world.store.saves().len();
    ensure!(saves == count, "remote store received {saves} saves, expected {count}");
    Ok(())
}

#[then("the action is rejected as invalid")]
fn rejected_as_invalid(world: &mut TaskEngineWorld) -> Result<(), eyre::Report> {
    let err = last_command_error(world)?;
    ensure!(
        matches!(err, CommandError::Validation(_)),
        "expected a validation error, got {err}"
    );
    Ok(())
}

#[then("the action is rejected as not found")]
fn rejected_as_not_found(world: &mut TaskEngineWorld) -> Result<(), eyre::Report> {
    let err = last_command_error(world)?;
    ensure!(
        matches!(err, CommandError::TaskNotFound(_)),
        "expected a not-found error, got {err}"
    );
    Ok(())
}

#[then("the task list is unchanged")]
fn task_list_unchanged(world: &mut TaskEngineWorld) -> Result<(), eyre::Report> {
    let before = world
        .list_before_action
        .as_ref()
        .ok_or_else(|| eyre!("no action was recorded in the scenario world"))?;
    ensure!(
        world.engine.list() == before,
        "task list changed: {:?}",
        world.engine.tasks()
    );
    Ok(())
}

#[then("the engine is hydrated")]
fn engine_hydrated(world: &mut TaskEngineWorld) -> Result<(), eyre::Report> {
    ensure!(world.engine.is_hydrated(), "engine is not hydrated");
    Ok(())
}

#[then("the engine is not hydrated")]
fn engine_not_hydrated(world: &mut TaskEngineWorld) -> Result<(), eyre::Report> {
    ensure!(!world.engine.is_hydrated(), "engine is hydrated");
    Ok(())
}
