//! Stages: the named columns tasks are grouped into.

use super::{BoardDomainError, StageId, Task};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated stage name, unique across the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StageName(String);

impl StageName {
    /// Maximum number of characters the schema stores for a stage name.
    pub const MAX_LENGTH: usize = 30;

    /// Creates a validated stage name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyStageName`] when the trimmed value is
    /// empty or [`BoardDomainError::StageNameTooLong`] when it exceeds
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyStageName);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(BoardDomainError::StageNameTooLong {
                name: trimmed.to_owned(),
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StageName {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StageName> for String {
    fn from(name: StageName) -> Self {
        name.0
    }
}

impl AsRef<str> for StageName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    id: StageId,
    name: StageName,
}

impl Stage {
    /// Reconstructs a stage from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: StageId, name: StageName) -> Self {
        Self { id, name }
    }

    /// Returns the stage identifier.
    #[must_use]
    pub const fn id(&self) -> StageId {
        self.id
    }

    /// Returns the stage name.
    #[must_use]
    pub const fn name(&self) -> &StageName {
        &self.name
    }
}

/// How tasks are ordered inside a [`StageDetail`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskOrdering {
    /// Store insertion order (ascending task id).
    Insertion,
    /// Ascending position, ties broken by task id.
    #[default]
    Position,
}

/// A stage together with the tasks it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDetail {
    #[serde(flatten)]
    stage: Stage,
    tasks: Vec<Task>,
}

impl StageDetail {
    /// Groups tasks under their stage, ordering them as requested.
    #[must_use]
    pub fn new(stage: Stage, tasks: Vec<Task>, ordering: TaskOrdering) -> Self {
        let mut detail = Self { stage, tasks };
        match ordering {
            TaskOrdering::Insertion => detail.tasks.sort_by_key(Task::id),
            TaskOrdering::Position => detail.sort_by_position(),
        }
        detail
    }

    /// Returns the stage.
    #[must_use]
    pub const fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Returns the stage's tasks.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Consumes the detail and returns its parts.
    #[must_use]
    pub fn into_parts(self) -> (Stage, Vec<Task>) {
        (self.stage, self.tasks)
    }

    fn sort_by_position(&mut self) {
        self.tasks.sort_by_key(|task| (task.position(), task.id()));
    }
}
