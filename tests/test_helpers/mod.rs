//! Board helpers shared by the integration test crates.


use buildit_board::board::{
    domain::{Stage, StageId, Task, TaskId, TaskOrdering},
    ports::BoardStore,
    services::{BoardService, CreateTaskRequest},
};
use std::collections::BTreeMap;

/// Stage layout as `(stage name, task names in order)`.
pub type Layout<'a> = &'a [(&'a str, &'a [&'a str])];

/// Board contents as `(stage name, task names in position order)`.
pub type Snapshot = Vec<(String, Vec<String>)>;

/// Identifiers of a seeded board, keyed by name.
#[derive(Debug, Default)]
pub struct SeededBoard {
    stages: BTreeMap<String, StageId>,
    tasks: BTreeMap<String, TaskId>,
}

impl SeededBoard {
    /// Returns the identifier of a seeded stage.
    ///
    /// # Errors
    ///
    /// Returns an error when no stage of that name was seeded.
    pub fn stage(&self, name: &str) -> Result<StageId, eyre::Report> {
        self.stages
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("stage {name:?} was not seeded"))
    }

    /// Returns the identifier of a seeded task.
    ///
    /// # Errors
    ///
    /// Returns an error when no task of that name was seeded.
    pub fn task(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("task {name:?} was not seeded"))
    }

    /// Records a stage created outside [`seed`].
    pub fn record_stage(&mut self, stage: &Stage) {
        self.stages.insert(stage.name().as_str().to_owned(), stage.id());
    }

    /// Records a task created outside [`seed`].
    pub fn record_task(&mut self, task: &Task) {
        self.tasks.insert(task.name().as_str().to_owned(), task.id());
    }
}

/// Creates the stages and tasks of `layout`, appending tasks in order.
///
/// # Errors
///
/// Returns an error if any stage or task creation fails.
pub async fn seed<S: BoardStore>(
    service: &BoardService<S>,
    layout: Layout<'_>,
) -> Result<SeededBoard, eyre::Report> {
    let mut seeded = SeededBoard::default();
    for (stage_name, task_names) in layout {
        let stage = service.create_stage(*stage_name).await?;
        seeded.record_stage(&stage);
        for task_name in *task_names {
            let task = service
                .create_task(CreateTaskRequest::new(*task_name, stage.id()))
                .await?;
            seeded.record_task(&task);
        }
    }
    Ok(seeded)
}

/// Reads the board in position order.
///
/// # Errors
///
/// Returns an error if the listing fails.
pub async fn snapshot<S: BoardStore>(service: &BoardService<S>) -> Result<Snapshot, eyre::Report> {
    let details = service
        .list_stages_with_tasks(TaskOrdering::Position)
        .await?;
    Ok(details
        .iter()
        .map(|detail| {
            (
                detail.stage().name().as_str().to_owned(),
                detail
                    .tasks()
                    .iter()
                    .map(|task| task.name().as_str().to_owned())
                    .collect(),
            )
        })
        .collect())
}

/// Builds the expected snapshot for `layout`.
#[must_use]
pub fn expected(layout: Layout<'_>) -> Snapshot {
    layout
        .iter()
        .map(|(stage, tasks)| {
            (
                (*stage).to_owned(),
                tasks.iter().map(|task| (*task).to_owned()).collect(),
            )
        })
        .collect()
}

/// Reads every task keyed by identifier, for before/after comparisons.
///
/// # Errors
///
/// Returns an error if the listing fails.
pub async fn placements<S: BoardStore>(
    service: &BoardService<S>,
) -> Result<BTreeMap<TaskId, Task>, eyre::Report> {
    let details = service
        .list_stages_with_tasks(TaskOrdering::Insertion)
        .await?;
    Ok(details
        .into_iter()
        .flat_map(|detail| detail.into_parts().1)
        .map(|task| (task.id(), task))
        .collect())
}

/// Asserts that every stage keeps dense positions.
///
/// # Errors
///
/// Returns an error describing the first stage whose ordering is broken.
pub async fn ensure_dense<S: BoardStore>(service: &BoardService<S>) -> Result<(), eyre::Report> {
    service.verify_density().await?;
    Ok(())
}

/// Routes engine logs to the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}
