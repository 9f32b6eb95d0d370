//! In-memory board store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::board::{
    domain::{
        FieldUpdate, PersistedTaskData, Placement, Position, PositionShift, Stage, StageId,
        StageName, Task, TaskId, TaskName, TaskPatch,
    },
    ports::{BoardStore, BoardStoreError, BoardStoreResult, BoardTransaction},
};

/// Thread-safe in-memory board store.
///
/// Transactions are serialized behind a mutex. Each one works on a copy of
/// the committed state, which replaces the original only when the operation
/// succeeds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardStore {
    state: Arc<Mutex<BoardState>>,
}

#[derive(Debug, Clone, Default)]
struct BoardState {
    stages: BTreeMap<StageId, StageName>,
    tasks: BTreeMap<TaskId, TaskRecord>,
    last_stage_id: i64,
    last_task_id: i64,
}

#[derive(Debug, Clone)]
struct TaskRecord {
    name: TaskName,
    stage_id: StageId,
    position: Position,
}

impl TaskRecord {
    fn to_task(&self, id: TaskId) -> Task {
        Task::from_persisted(PersistedTaskData {
            id,
            name: self.name.clone(),
            stage_id: self.stage_id,
            position: self.position,
        })
    }
}

impl InMemoryBoardStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn run<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E>,
        E: From<BoardStoreError>,
    {
        let mut committed = self.state.lock().map_err(|err| {
            BoardStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut working = MemoryTransaction {
            state: committed.clone(),
        };
        let output = operation(&mut working)?;
        *committed = working.state;
        Ok(output)
    }
}

#[async_trait]
impl BoardStore for InMemoryBoardStore {
    async fn transaction<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<BoardStoreError> + Send + 'static,
    {
        self.run(operation)
    }
}

struct MemoryTransaction {
    state: BoardState,
}

impl MemoryTransaction {
    fn stage_tasks(&self, stage_id: StageId) -> impl Iterator<Item = (&TaskId, &TaskRecord)> {
        self.state
            .tasks
            .iter()
            .filter(move |(_, record)| record.stage_id == stage_id)
    }

    fn require_stage(&self, stage_id: StageId) -> BoardStoreResult<()> {
        if self.state.stages.contains_key(&stage_id) {
            Ok(())
        } else {
            Err(BoardStoreError::UnknownStage(stage_id))
        }
    }
}

impl BoardTransaction for MemoryTransaction {
    fn insert_stage(&mut self, name: &StageName) -> BoardStoreResult<Stage> {
        if self.state.stages.values().any(|existing| existing == name) {
            return Err(BoardStoreError::DuplicateStageName(name.clone()));
        }
        self.state.last_stage_id = self.state.last_stage_id.saturating_add(1);
        let id = StageId::from_raw(self.state.last_stage_id);
        self.state.stages.insert(id, name.clone());
        Ok(Stage::from_persisted(id, name.clone()))
    }

    fn find_stage(&mut self, id: StageId) -> BoardStoreResult<Option<Stage>> {
        Ok(self
            .state
            .stages
            .get(&id)
            .map(|name| Stage::from_persisted(id, name.clone())))
    }

    fn find_stage_by_name(&mut self, name: &StageName) -> BoardStoreResult<Option<Stage>> {
        Ok(self
            .state
            .stages
            .iter()
            .find(|(_, existing)| *existing == name)
            .map(|(id, existing)| Stage::from_persisted(*id, existing.clone())))
    }

    fn list_stages(&mut self) -> BoardStoreResult<Vec<Stage>> {
        Ok(self
            .state
            .stages
            .iter()
            .map(|(id, name)| Stage::from_persisted(*id, name.clone()))
            .collect())
    }

    fn insert_task(&mut self, name: &TaskName, placement: Placement) -> BoardStoreResult<Task> {
        self.require_stage(placement.stage_id)?;
        self.state.last_task_id = self.state.last_task_id.saturating_add(1);
        let id = TaskId::from_raw(self.state.last_task_id);
        let record = TaskRecord {
            name: name.clone(),
            stage_id: placement.stage_id,
            position: placement.position,
        };
        let task = record.to_task(id);
        self.state.tasks.insert(id, record);
        Ok(task)
    }

    fn find_task(&mut self, id: TaskId) -> BoardStoreResult<Option<Task>> {
        Ok(self.state.tasks.get(&id).map(|record| record.to_task(id)))
    }

    fn list_tasks(&mut self) -> BoardStoreResult<Vec<Task>> {
        Ok(self
            .state
            .tasks
            .iter()
            .map(|(id, record)| record.to_task(*id))
            .collect())
    }

    fn list_tasks_by_stage(&mut self, stage_id: StageId) -> BoardStoreResult<Vec<Task>> {
        Ok(self
            .stage_tasks(stage_id)
            .map(|(id, record)| record.to_task(*id))
            .collect())
    }

    fn count_tasks(&mut self, stage_id: StageId) -> BoardStoreResult<usize> {
        Ok(self.stage_tasks(stage_id).count())
    }

    fn update_task_fields(&mut self, id: TaskId, patch: &TaskPatch) -> BoardStoreResult<usize> {
        if let FieldUpdate::Set(stage_id) = patch.stage_id {
            self.require_stage(stage_id)?;
        }
        let Some(record) = self.state.tasks.get_mut(&id) else {
            return Ok(0);
        };
        if let FieldUpdate::Set(name) = &patch.name {
            record.name = name.clone();
        }
        if let FieldUpdate::Set(stage_id) = patch.stage_id {
            record.stage_id = stage_id;
        }
        if let FieldUpdate::Set(position) = patch.position {
            record.position = position;
        }
        Ok(1)
    }

    fn shift_positions(&mut self, shift: &PositionShift) -> BoardStoreResult<usize> {
        let mut affected = 0_usize;
        for record in self.state.tasks.values_mut() {
            let shifted = shift.apply(record.stage_id, record.position);
            if shifted != record.position {
                record.position = shifted;
                affected = affected.saturating_add(1);
            }
        }
        Ok(affected)
    }

    fn delete_task(&mut self, id: TaskId) -> BoardStoreResult<usize> {
        Ok(usize::from(self.state.tasks.remove(&id).is_some()))
    }
}
