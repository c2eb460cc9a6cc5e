//! Given steps for task engine BDD scenarios.

use super::world::{TaskEngineWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskmind::task::domain::{
    Priority, Task, TaskData, TaskId, TaskStatus, TaskType, parse_due_date,
};

#[given(r#"today is "{today}""#)]
fn today_is(world: &mut TaskEngineWorld, today: String) -> Result<(), eyre::Report> {
    let date = parse_due_date(&today).wrap_err("parse scenario date")?;
    world.clock.set(date);
    Ok(())
}

#[given(r#"the remote store holds a {status} "{kind}" task "{id}" due "{due}" with priority "{priority}""#)]
fn remote_store_holds_task(
    world: &mut TaskEngineWorld,
    status: String,
    kind: String,
    id: String,
    due: String,
    priority: String,
) -> Result<(), eyre::Report> {
    let task = Task::from_data(TaskData {
        title: format!("task {id}"),
        id: TaskId::new(id)?,
        task_type: TaskType::try_from(kind.as_str())?,
        due_date: parse_due_date(&due)?,
        status: TaskStatus::try_from(status.as_str())?,
        priority: Priority::try_from(priority.as_str())?,
        subtasks: Vec::new(),
    })?;
    let mut tasks = world.store.tasks();
    tasks.push(task);
    world.store.set_tasks(tasks);
    Ok(())
}

#[given("the remote store is unreachable")]
fn remote_store_unreachable(world: &mut TaskEngineWorld) {
    world.store.fail_next_loads(usize::MAX);
}

#[given("the engine has loaded an empty task list")]
fn engine_loaded_empty(world: &mut TaskEngineWorld) -> Result<(), eyre::Report> {
    run_async(world.engine.load()).wrap_err("load empty task list")?;
    Ok(())
}

#[given("the engine has loaded the task list")]
fn engine_loaded(world: &mut TaskEngineWorld) -> Result<(), eyre::Report> {
    run_async(world.engine.load()).wrap_err("load seeded task list")?;
    Ok(())
}

