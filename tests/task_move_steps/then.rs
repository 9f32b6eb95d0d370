//! Then steps for task ordering BDD scenarios.

use super::world::{BoardWorld, names, run_async};
use rstest_bdd_macros::then;

#[then(r#"stage "{stage}" lists "{tasks}""#)]
fn stage_lists(world: &BoardWorld, stage: String, tasks: String) -> Result<(), eyre::Report> {
    let listed: Vec<String> = run_async(world.service.list_tasks_by_stage(world.stage(&stage)?))?
        .iter()
        .map(|task| task.name().as_str().to_owned())
        .collect();
    let expected = names(&tasks);

    if listed != expected {
        return Err(eyre::eyre!(
            "stage {stage:?}: expected {expected:?}, found {listed:?}"
        ));
    }
    Ok(())
}

#[then(r#"task "{task}" sits at position {position:u32}"#)]
fn task_sits_at(world: &BoardWorld, task: String, position: u32) -> Result<(), eyre::Report> {
    let found = run_async(world.service.find_task(world.task(&task)?))?
        .ok_or_else(|| eyre::eyre!("task {task:?} no longer exists"))?;

    if found.position().value() != position {
        return Err(eyre::eyre!(
            "task {task:?}: expected position {position}, found {}",
            found.position()
        ));
    }
    Ok(())
}

#[then("every stage is densely ordered")]
fn densely_ordered(world: &BoardWorld) -> Result<(), eyre::Report> {
    run_async(world.service.verify_density())?;
    Ok(())
}

#[then(r#"the operation fails with "{kind}""#)]
fn operation_fails_with(world: &BoardWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation result"))?;

    match result {
        Err(err) if format!("{:?}", err.kind()) == kind => Ok(()),
        other => Err(eyre::eyre!("expected a {kind} failure, got {other:?}")),
    }
}
