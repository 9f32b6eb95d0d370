//! Store port for stage and task persistence.
//!
//! Every engine operation runs inside exactly one [`BoardStore::transaction`].
//! The closure receives a [`BoardTransaction`] exposing row-level primitives;
//! returning `Err` from the closure rolls back every write it issued.

use crate::board::domain::{
    Placement, PositionShift, Stage, StageId, StageName, Task, TaskId, TaskName, TaskPatch,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type BoardStoreResult<T> = Result<T, BoardStoreError>;

/// Row-level primitives available inside a store transaction.
#[cfg_attr(test, mockall::automock)]
pub trait BoardTransaction {
    /// Inserts a stage and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::DuplicateStageName`] when the name is taken.
    fn insert_stage(&mut self, name: &StageName) -> BoardStoreResult<Stage>;

    /// Finds a stage by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the lookup fails.
    fn find_stage(&mut self, id: StageId) -> BoardStoreResult<Option<Stage>>;

    /// Finds a stage by its unique name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the lookup fails.
    fn find_stage_by_name(&mut self, name: &StageName) -> BoardStoreResult<Option<Stage>>;

    /// Returns every stage in identifier order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the query fails.
    fn list_stages(&mut self) -> BoardStoreResult<Vec<Stage>>;

    /// Inserts a task at the given placement and returns it with its
    /// assigned identifier. No neighbour is shifted.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::UnknownStage`] when the stage does not
    /// exist.
    fn insert_task(&mut self, name: &TaskName, placement: Placement) -> BoardStoreResult<Task>;

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the lookup fails.
    fn find_task(&mut self, id: TaskId) -> BoardStoreResult<Option<Task>>;

    /// Returns every task in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the query fails.
    fn list_tasks(&mut self) -> BoardStoreResult<Vec<Task>>;

    /// Returns the tasks of one stage in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the query fails.
    fn list_tasks_by_stage(&mut self, stage_id: StageId) -> BoardStoreResult<Vec<Task>>;

    /// Counts the tasks of one stage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the query fails.
    fn count_tasks(&mut self, stage_id: StageId) -> BoardStoreResult<usize>;

    /// Writes the supplied fields of a task and returns the number of rows
    /// affected. Absent fields are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::UnknownStage`] when the patch points at a
    /// missing stage.
    fn update_task_fields(&mut self, id: TaskId, patch: &TaskPatch) -> BoardStoreResult<usize>;

    /// Applies one range shift and returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the update fails.
    fn shift_positions(&mut self, shift: &PositionShift) -> BoardStoreResult<usize>;

    /// Deletes a task and returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the delete fails.
    fn delete_task(&mut self, id: TaskId) -> BoardStoreResult<usize>;
}

/// Transactional access to board persistence.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Runs `operation` inside one atomic transaction.
    ///
    /// The transaction commits when `operation` returns `Ok` and rolls back
    /// every write when it returns `Err`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `operation`, or a
    /// [`BoardStoreError::Persistence`] (converted into `E`) when the
    /// transaction cannot be opened or committed.
    async fn transaction<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<BoardStoreError> + Send + 'static;
}

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardStoreError {
    /// A stage with the same name already exists.
    #[error("duplicate stage name: {0}")]
    DuplicateStageName(StageName),

    /// A task referenced a stage that does not exist.
    #[error("unknown stage: {0}")]
    UnknownStage(StageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a stored value that no longer satisfies a domain rule.
    pub fn corrupt_row(detail: impl Into<String>) -> Self {
        Self::persistence(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            detail.into(),
        ))
    }
}
