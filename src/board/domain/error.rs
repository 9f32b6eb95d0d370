//! Error types for board domain validation.

use thiserror::Error;

/// Errors returned while constructing domain board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The stage name is empty after trimming.
    #[error("stage name must not be empty")]
    EmptyStageName,

    /// The stage name exceeds the persisted column width.
    #[error("stage name '{name}' is longer than {max} characters")]
    StageNameTooLong {
        /// The rejected name.
        name: String,
        /// Maximum number of characters.
        max: usize,
    },

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The position does not fit the persisted integer column.
    #[error("position {0} exceeds the largest storable position")]
    PositionTooLarge(u32),
}
