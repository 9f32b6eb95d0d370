//! Shared world state for task ordering BDD scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use buildit_board::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{StageId, Task, TaskId},
    services::{BoardError, BoardService},
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestBoardService = BoardService<InMemoryBoardStore>;

/// Scenario world for task ordering behaviour tests.
pub struct BoardWorld {
    pub service: TestBoardService,
    pub stages: BTreeMap<String, StageId>,
    pub tasks: BTreeMap<String, TaskId>,
    pub last_result: Option<Result<Task, BoardError>>,
}

impl BoardWorld {
    /// Creates a world over an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: BoardService::new(Arc::new(InMemoryBoardStore::new())),
            stages: BTreeMap::new(),
            tasks: BTreeMap::new(),
            last_result: None,
        }
    }

    /// Looks up a stage created earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when the scenario never created the stage.
    pub fn stage(&self, name: &str) -> Result<StageId, eyre::Report> {
        self.stages
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("stage {name:?} is not part of the scenario"))
    }

    /// Looks up a task created earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when the scenario never created the task.
    pub fn task(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("task {name:?} is not part of the scenario"))
    }

    /// Records the outcome of a mutation, tracking renamed tasks.
    pub fn record(&mut self, result: Result<Task, BoardError>) {
        if let Ok(task) = &result {
            self.tasks
                .insert(task.name().as_str().to_owned(), task.id());
        }
        self.last_result = Some(result);
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Splits a comma-separated list of names.
pub fn names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
