//! Board operations: the ordering engine's public contract.
//!
//! Each operation runs in exactly one store transaction. Position shifts are
//! planned by [`crate::board::domain::ordering`] and applied as range updates
//! before the moved task's own row is written, so a failure at any step rolls
//! the whole operation back.

use super::error::{BoardError, BoardErrorKind, BoardResult};
use crate::board::{
    domain::{
        FieldUpdate, Placement, Position, Stage, StageDetail, StageId, StageName, Task, TaskId,
        TaskName, TaskOrdering, TaskPatch, check_density, ordering::max_insertion_index,
        plan_move, plan_removal,
    },
    ports::{BoardStore, BoardTransaction},
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Request payload for creating a task at the end of a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    name: String,
    stage_id: StageId,
}

impl CreateTaskRequest {
    /// Creates a request for a task named `name` in `stage_id`.
    #[must_use]
    pub fn new(name: impl Into<String>, stage_id: StageId) -> Self {
        Self {
            name: name.into(),
            stage_id,
        }
    }
}

/// Request payload for relocating a task.
///
/// A missing stage keeps the task in its current stage. A missing position
/// keeps the current slot within the same stage and appends when the stage
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTaskRequest {
    task_id: TaskId,
    stage_id: Option<StageId>,
    position: Option<u32>,
}

impl MoveTaskRequest {
    /// Creates a request carrying no destination yet.
    #[must_use]
    pub const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            stage_id: None,
            position: None,
        }
    }

    /// Sets the destination stage.
    #[must_use]
    pub const fn to_stage(mut self, stage_id: StageId) -> Self {
        self.stage_id = Some(stage_id);
        self
    }

    /// Sets the destination position.
    #[must_use]
    pub const fn to_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }
}

/// Board orchestration service.
#[derive(Clone)]
pub struct BoardService<S>
where
    S: BoardStore,
{
    store: Arc<S>,
}

impl<S> BoardService<S>
where
    S: BoardStore,
{
    /// Creates a new board service over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a stage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] for an invalid name or
    /// [`BoardError::Store`] carrying
    /// [`crate::board::ports::BoardStoreError::DuplicateStageName`] when the
    /// name is taken.
    #[instrument(skip(self, name), level = "debug")]
    pub async fn create_stage(&self, name: impl Into<String> + Send) -> BoardResult<Stage> {
        let stage_name = StageName::new(name)?;
        let result = self
            .store
            .transaction(move |tx| -> BoardResult<Stage> {
                Ok(tx.insert_stage(&stage_name)?)
            })
            .await;
        traced("create_stage", result).inspect(|stage| {
            debug!(stage_id = %stage.id(), name = %stage.name(), "stage created");
        })
    }

    /// Appends a new task to the end of its stage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] for an invalid name and
    /// [`BoardError::StageNotFound`] when the stage does not exist.
    #[instrument(skip(self), level = "debug")]
    pub async fn create_task(&self, request: CreateTaskRequest) -> BoardResult<Task> {
        let task_name = TaskName::new(request.name)?;
        let stage_id = request.stage_id;
        let result = self
            .store
            .transaction(move |tx| append_task(tx, &task_name, stage_id))
            .await;
        traced("create_task", result).inspect(|task| {
            debug!(task_id = %task.id(), placement = %task.placement(), "task created");
        })
    }

    /// Renames a task without touching its placement.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] for an invalid name and
    /// [`BoardError::TaskNotFound`] when the task does not exist.
    #[instrument(skip(self, name), level = "debug")]
    pub async fn rename_task(
        &self,
        task_id: TaskId,
        name: impl Into<String> + Send,
    ) -> BoardResult<Task> {
        let patch = TaskPatch::new().with_name(TaskName::new(name)?);
        self.patch_task(task_id, patch).await
    }

    /// Moves a task within its stage or into another stage, shifting the
    /// neighbours it leaves and joins.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NoFieldsToUpdate`] when the request names
    /// neither stage nor position, [`BoardError::TaskNotFound`] or
    /// [`BoardError::StageNotFound`] for missing rows, and
    /// [`BoardError::PositionOutOfRange`] when the target slot is beyond the
    /// end of the destination stage.
    #[instrument(skip(self), level = "debug")]
    pub async fn move_task(&self, request: MoveTaskRequest) -> BoardResult<Task> {
        let position = request.position.map(Position::new).transpose()?;
        let patch = TaskPatch {
            stage_id: FieldUpdate::from(request.stage_id),
            position: FieldUpdate::from(position),
            ..TaskPatch::default()
        };
        self.patch_task(request.task_id, patch).await
    }

    /// Applies a partial update: relocation fields run the move algorithm,
    /// then the name (when supplied) is written in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NoFieldsToUpdate`] for an empty patch, plus every
    /// error [`Self::move_task`] can return.
    #[instrument(skip(self), level = "debug")]
    pub async fn patch_task(&self, task_id: TaskId, patch: TaskPatch) -> BoardResult<Task> {
        let result = self
            .store
            .transaction(move |tx| apply_patch(tx, task_id, patch))
            .await;
        traced("patch_task", result).inspect(|task| {
            debug!(task_id = %task.id(), placement = %task.placement(), "task updated");
        })
    }

    /// Deletes a task and closes the gap it leaves in its stage.
    ///
    /// Returns the removed task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] when the task does not exist.
    #[instrument(skip(self), level = "debug")]
    pub async fn delete_task(&self, task_id: TaskId) -> BoardResult<Task> {
        let result = self
            .store
            .transaction(move |tx| remove_task(tx, task_id))
            .await;
        traced("delete_task", result).inspect(|task| {
            debug!(task_id = %task.id(), placement = %task.placement(), "task deleted");
        })
    }

    /// Returns every stage with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] when the store cannot be read.
    pub async fn list_stages_with_tasks(
        &self,
        ordering: TaskOrdering,
    ) -> BoardResult<Vec<StageDetail>> {
        let result = self
            .store
            .transaction(move |tx| collect_board(tx, ordering))
            .await;
        traced("list_stages_with_tasks", result)
    }

    /// Returns every stage in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] when the store cannot be read.
    pub async fn list_stages(&self) -> BoardResult<Vec<Stage>> {
        let result = self
            .store
            .transaction(|tx| -> BoardResult<Vec<Stage>> { Ok(tx.list_stages()?) })
            .await;
        traced("list_stages", result)
    }

    /// Returns the tasks of one stage in position order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StageNotFound`] when the stage does not exist.
    pub async fn list_tasks_by_stage(&self, stage_id: StageId) -> BoardResult<Vec<Task>> {
        let result = self
            .store
            .transaction(move |tx| -> BoardResult<Vec<Task>> {
                require_stage(tx, stage_id)?;
                let mut tasks = tx.list_tasks_by_stage(stage_id)?;
                tasks.sort_by_key(|task| (task.position(), task.id()));
                Ok(tasks)
            })
            .await;
        traced("list_tasks_by_stage", result)
    }

    /// Looks a task up by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] when the lookup fails.
    pub async fn find_task(&self, task_id: TaskId) -> BoardResult<Option<Task>> {
        let result = self
            .store
            .transaction(move |tx| -> BoardResult<Option<Task>> {
                Ok(tx.find_task(task_id)?)
            })
            .await;
        traced("find_task", result)
    }

    /// Looks a stage up by name.
    ///
    /// Returns `Ok(None)` when no stage has that name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] for an invalid name or
    /// [`BoardError::Store`] when the lookup fails.
    pub async fn find_stage_by_name(
        &self,
        name: impl Into<String> + Send,
    ) -> BoardResult<Option<Stage>> {
        let stage_name = StageName::new(name)?;
        let result = self
            .store
            .transaction(move |tx| -> BoardResult<Option<Stage>> {
                Ok(tx.find_stage_by_name(&stage_name)?)
            })
            .await;
        traced("find_stage_by_name", result)
    }

    /// Checks that every stage's positions are exactly `0..n`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CorruptOrdering`] for the first stage whose
    /// ordering has a gap or a duplicate.
    pub async fn verify_density(&self) -> BoardResult<()> {
        let result = self
            .store
            .transaction(|tx| -> BoardResult<()> {
                for detail in collect_board(tx, TaskOrdering::Insertion)? {
                    check_density(detail.tasks().iter().map(Task::position)).map_err(
                        |violation| BoardError::CorruptOrdering {
                            stage_id: detail.stage().id(),
                            violation,
                        },
                    )?;
                }
                Ok(())
            })
            .await;
        traced("verify_density", result)
    }
}

fn append_task(
    tx: &mut dyn BoardTransaction,
    name: &TaskName,
    stage_id: StageId,
) -> BoardResult<Task> {
    require_stage(tx, stage_id)?;
    let position = Position::try_from(tx.count_tasks(stage_id)?)?;
    Ok(tx.insert_task(name, Placement::new(stage_id, position))?)
}

fn apply_patch(
    tx: &mut dyn BoardTransaction,
    task_id: TaskId,
    patch: TaskPatch,
) -> BoardResult<Task> {
    if patch.is_empty() {
        return Err(BoardError::NoFieldsToUpdate);
    }
    let current = tx
        .find_task(task_id)?
        .ok_or(BoardError::TaskNotFound(task_id))?;

    let mut changes = TaskPatch {
        name: patch.name,
        ..TaskPatch::default()
    };
    if patch.stage_id.is_set() || patch.position.is_set() {
        let destination = resolve_destination(tx, &current, patch.stage_id, patch.position)?;
        let plan = plan_move(current.placement(), destination);
        if !plan.is_noop() {
            for shift in plan.shifts() {
                let shifted = tx.shift_positions(shift)?;
                debug!(%shift, shifted, "shifted neighbours");
            }
            changes = changes.with_placement(destination);
        }
    }

    if changes.is_empty() {
        return Ok(current);
    }
    expect_single_row(tx.update_task_fields(task_id, &changes)?, task_id)?;
    tx.find_task(task_id)?
        .ok_or(BoardError::TaskNotFound(task_id))
}

fn resolve_destination(
    tx: &mut dyn BoardTransaction,
    current: &Task,
    stage_id: FieldUpdate<StageId>,
    position: FieldUpdate<Position>,
) -> BoardResult<Placement> {
    let origin = current.placement();
    let target_stage = stage_id.into_option().unwrap_or(origin.stage_id);
    let same_stage = target_stage == origin.stage_id;
    if !same_stage {
        require_stage(tx, target_stage)?;
    }

    let max = max_insertion_index(tx.count_tasks(target_stage)?, same_stage);
    let target_position = match position {
        FieldUpdate::Set(requested) => requested,
        FieldUpdate::Absent if same_stage => origin.position,
        FieldUpdate::Absent => Position::try_from(max)?,
    };
    if usize::try_from(target_position.value()).unwrap_or(usize::MAX) > max {
        return Err(BoardError::PositionOutOfRange {
            position: target_position,
            max,
        });
    }
    Ok(Placement::new(target_stage, target_position))
}

fn remove_task(tx: &mut dyn BoardTransaction, task_id: TaskId) -> BoardResult<Task> {
    let task = tx
        .find_task(task_id)?
        .ok_or(BoardError::TaskNotFound(task_id))?;
    expect_single_row(tx.delete_task(task_id)?, task_id)?;
    let shift = plan_removal(task.placement());
    let shifted = tx.shift_positions(&shift)?;
    debug!(%shift, shifted, "closed gap");
    Ok(task)
}

fn collect_board(
    tx: &mut dyn BoardTransaction,
    ordering: TaskOrdering,
) -> BoardResult<Vec<StageDetail>> {
    let stages = tx.list_stages()?;
    let mut tasks_by_stage: BTreeMap<StageId, Vec<Task>> = BTreeMap::new();
    for task in tx.list_tasks()? {
        tasks_by_stage.entry(task.stage_id()).or_default().push(task);
    }
    Ok(stages
        .into_iter()
        .map(|stage| {
            let tasks = tasks_by_stage.remove(&stage.id()).unwrap_or_default();
            StageDetail::new(stage, tasks, ordering)
        })
        .collect())
}

fn require_stage(tx: &mut dyn BoardTransaction, stage_id: StageId) -> BoardResult<Stage> {
    tx.find_stage(stage_id)?
        .ok_or(BoardError::StageNotFound(stage_id))
}

const fn expect_single_row(rows: usize, task_id: TaskId) -> BoardResult<()> {
    match rows {
        0 => Err(BoardError::TaskNotFound(task_id)),
        1 => Ok(()),
        _ => Err(BoardError::MultipleRowsUpdated(rows)),
    }
}

/// Logs a failed operation at a level matching its error kind.
fn traced<T>(operation: &'static str, result: BoardResult<T>) -> BoardResult<T> {
    if let Err(err) = &result {
        if err.kind() == BoardErrorKind::Internal {
            warn!(operation, error = %err, "board operation failed");
        } else {
            debug!(operation, error = %err, "board operation rejected");
        }
    }
    result
}
