//! Row-level board primitives over one open SQLite transaction.

use super::{
    models::{NewStageRow, NewTaskRow, StageRow, TaskChangeset, TaskRow},
    schema::{stage, task},
};
use crate::board::{
    domain::{
        PersistedTaskData, Placement, Position, PositionShift, Stage, StageId, StageName, Task,
        TaskId, TaskName, TaskPatch,
    },
    ports::{BoardStoreError, BoardStoreResult, BoardTransaction},
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;

/// [`BoardTransaction`] bound to a connection that is inside a transaction.
pub(super) struct SqliteTransaction<'conn> {
    conn: &'conn mut SqliteConnection,
}

impl<'conn> SqliteTransaction<'conn> {
    pub(super) const fn new(conn: &'conn mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl BoardTransaction for SqliteTransaction<'_> {
    fn insert_stage(&mut self, name: &StageName) -> BoardStoreResult<Stage> {
        let row = diesel::insert_into(stage::table)
            .values(&NewStageRow {
                name: name.as_str(),
            })
            .returning(StageRow::as_returning())
            .get_result::<StageRow>(&mut *self.conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    BoardStoreError::DuplicateStageName(name.clone())
                }
                _ => BoardStoreError::persistence(err),
            })?;
        row_to_stage(row)
    }

    fn find_stage(&mut self, id: StageId) -> BoardStoreResult<Option<Stage>> {
        let row = stage::table
            .find(id.value())
            .select(StageRow::as_select())
            .first::<StageRow>(&mut *self.conn)
            .optional()
            .map_err(BoardStoreError::persistence)?;
        row.map(row_to_stage).transpose()
    }

    fn find_stage_by_name(&mut self, name: &StageName) -> BoardStoreResult<Option<Stage>> {
        let row = stage::table
            .filter(stage::name.eq(name.as_str()))
            .select(StageRow::as_select())
            .first::<StageRow>(&mut *self.conn)
            .optional()
            .map_err(BoardStoreError::persistence)?;
        row.map(row_to_stage).transpose()
    }

    fn list_stages(&mut self) -> BoardStoreResult<Vec<Stage>> {
        let rows = stage::table
            .order(stage::id.asc())
            .select(StageRow::as_select())
            .load::<StageRow>(&mut *self.conn)
            .map_err(BoardStoreError::persistence)?;
        rows.into_iter().map(row_to_stage).collect()
    }

    fn insert_task(&mut self, name: &TaskName, placement: Placement) -> BoardStoreResult<Task> {
        let row = diesel::insert_into(task::table)
            .values(&NewTaskRow {
                name: name.as_str(),
                stage_id: placement.stage_id.value(),
                position: position_to_column(placement.position)?,
            })
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(&mut *self.conn)
            .map_err(|err| map_task_write_error(err, Some(placement.stage_id)))?;
        row_to_task(row)
    }

    fn find_task(&mut self, id: TaskId) -> BoardStoreResult<Option<Task>> {
        let row = task::table
            .find(id.value())
            .select(TaskRow::as_select())
            .first::<TaskRow>(&mut *self.conn)
            .optional()
            .map_err(BoardStoreError::persistence)?;
        row.map(row_to_task).transpose()
    }

    fn list_tasks(&mut self) -> BoardStoreResult<Vec<Task>> {
        let rows = task::table
            .order(task::id.asc())
            .select(TaskRow::as_select())
            .load::<TaskRow>(&mut *self.conn)
            .map_err(BoardStoreError::persistence)?;
        rows.into_iter().map(row_to_task).collect()
    }

    fn list_tasks_by_stage(&mut self, stage_id: StageId) -> BoardStoreResult<Vec<Task>> {
        let rows = task::table
            .filter(task::stage_id.eq(stage_id.value()))
            .order(task::id.asc())
            .select(TaskRow::as_select())
            .load::<TaskRow>(&mut *self.conn)
            .map_err(BoardStoreError::persistence)?;
        rows.into_iter().map(row_to_task).collect()
    }

    fn count_tasks(&mut self, stage_id: StageId) -> BoardStoreResult<usize> {
        let count = task::table
            .filter(task::stage_id.eq(stage_id.value()))
            .count()
            .get_result::<i64>(&mut *self.conn)
            .map_err(BoardStoreError::persistence)?;
        usize::try_from(count).map_err(BoardStoreError::persistence)
    }

    fn update_task_fields(&mut self, id: TaskId, patch: &TaskPatch) -> BoardStoreResult<usize> {
        let changeset = TaskChangeset {
            name: patch.name.as_set().map(TaskName::as_str),
            stage_id: patch.stage_id.as_set().map(|stage_id| stage_id.value()),
            position: patch
                .position
                .as_set()
                .map(|position| position_to_column(*position))
                .transpose()?,
        };
        let target_stage = patch.stage_id.as_set().copied();
        diesel::update(task::table.find(id.value()))
            .set(&changeset)
            .execute(&mut *self.conn)
            .map_err(|err| map_task_write_error(err, target_stage))
    }

    fn shift_positions(&mut self, shift: &PositionShift) -> BoardStoreResult<usize> {
        let start = position_to_column(shift.range.start())?;
        let end = shift
            .range
            .end()
            .map(position_to_column)
            .transpose()?
            .unwrap_or(i32::MAX);
        diesel::update(
            task::table
                .filter(task::stage_id.eq(shift.stage_id.value()))
                .filter(task::position.between(start, end)),
        )
        .set(task::position.eq(task::position + shift.direction.delta()))
        .execute(&mut *self.conn)
        .map_err(BoardStoreError::persistence)
    }

    fn delete_task(&mut self, id: TaskId) -> BoardStoreResult<usize> {
        diesel::delete(task::table.find(id.value()))
            .execute(&mut *self.conn)
            .map_err(BoardStoreError::persistence)
    }
}

fn map_task_write_error(err: DieselError, stage_id: Option<StageId>) -> BoardStoreError {
    match (&err, stage_id) {
        (DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _), Some(id)) => {
            BoardStoreError::UnknownStage(id)
        }
        _ => BoardStoreError::persistence(err),
    }
}

fn position_to_column(position: Position) -> BoardStoreResult<i32> {
    i32::try_from(position.value()).map_err(BoardStoreError::persistence)
}

fn row_to_stage(row: StageRow) -> BoardStoreResult<Stage> {
    let StageRow { id, name } = row;
    let stage_name = StageName::new(name)
        .map_err(|err| BoardStoreError::corrupt_row(format!("stage {id}: {err}")))?;
    Ok(Stage::from_persisted(StageId::from_raw(id), stage_name))
}

fn row_to_task(row: TaskRow) -> BoardStoreResult<Task> {
    let TaskRow {
        id,
        name,
        stage_id,
        position,
    } = row;

    let task_name = TaskName::new(name)
        .map_err(|err| BoardStoreError::corrupt_row(format!("task {id}: {err}")))?;
    let raw_position = u32::try_from(position).map_err(|_| {
        BoardStoreError::corrupt_row(format!("task {id}: negative position {position}"))
    })?;
    let task_position = Position::new(raw_position)
        .map_err(|err| BoardStoreError::corrupt_row(format!("task {id}: {err}")))?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_raw(id),
        name: task_name,
        stage_id: StageId::from_raw(stage_id),
        position: task_position,
    }))
}
