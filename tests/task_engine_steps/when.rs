//! When steps for task engine BDD scenarios.

use super::world::{ScriptedInterpreter, TaskEngineWorld, run_async};
use rstest_bdd_macros::when;
use taskmind::task::commands::{ActionEnvelope, TaskPayload};

fn interpret(world: &mut TaskEngineWorld, envelope: ActionEnvelope) {
    world.list_before_action = Some(world.engine.list().clone());
    let interpreter = ScriptedInterpreter::replying(envelope);
    let result = run_async(world.engine.interpret(&interpreter, "scenario request"));
    world.last_action_result = Some(result);
}

#[when("the engine loads the task list")]
fn engine_loads(world: &mut TaskEngineWorld) {
    let result = run_async(world.engine.load()).map(|_| ());
    world.last_action_result = Some(result);
}

#[when("the remote store recovers and the user retries")]
fn store_recovers_and_user_retries(world: &mut TaskEngineWorld) {
    world.store.fail_next_loads(0);
    let result = run_async(world.engine.retry()).map(|_| ());
    world.last_action_result = Some(result);
}

#[when(r#"the interpreter asks to create a "{kind}" task "{id}" titled "{title}" due "{due}""#)]
fn interpreter_creates(
    world: &mut TaskEngineWorld,
    kind: String,
    id: String,
    title: String,
    due: String,
) {
    let envelope = ActionEnvelope {
        db_action: Some("create".to_owned()),
        task: Some(TaskPayload {
            id: Some(id),
            title: Some(title),
            task_type: Some(kind),
            due_date: Some(due),
            ..TaskPayload::default()
        }),
        ..ActionEnvelope::default()
    };
    interpret(world, envelope);
}

#[when(r#"the interpreter asks to delete task "{id}""#)]
fn interpreter_deletes(world: &mut TaskEngineWorld, id: String) {
    let envelope = ActionEnvelope {
        db_action: Some("delete".to_owned()),
        task_id: Some(id),
        ..ActionEnvelope::default()
    };
    interpret(world, envelope);
}

#[when(r#"the interpreter asks to update task "{id}" to a "{kind}" task due "{due}""#)]
fn interpreter_updates(world: &mut TaskEngineWorld, id: String, kind: String, due: String) {
    let envelope = ActionEnvelope {
        db_action: Some("update".to_owned()),
        task: Some(TaskPayload {
            title: Some(format!("task {id}")),
            id: Some(id),
            task_type: Some(kind),
            due_date: Some(due),
            ..TaskPayload::default()
        }),
        ..ActionEnvelope::default()
    };
    interpret(world, envelope);
}
