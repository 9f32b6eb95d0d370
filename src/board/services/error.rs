//! Errors surfaced by board operations.

use crate::board::{
    domain::{BoardDomainError, DensityViolation, Position, StageId, TaskId},
    ports::BoardStoreError,
};
use thiserror::Error;

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] BoardStoreError),

    /// The referenced task does not exist.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// The referenced stage does not exist.
    #[error("stage {0} not found")]
    StageNotFound(StageId),

    /// A mutation request carried no field to change.
    #[error("no fields provided to update")]
    NoFieldsToUpdate,

    /// An update by identifier touched more than one row.
    #[error("unexpectedly updated {0} rows")]
    MultipleRowsUpdated(usize),

    /// The move target lies outside the destination stage.
    #[error("position {position} is out of range, expected 0..={max}")]
    PositionOutOfRange {
        /// Requested position.
        position: Position,
        /// Largest valid insertion index.
        max: usize,
    },

    /// A stage's positions are no longer dense.
    #[error("stage {stage_id} ordering is corrupt: {violation}")]
    CorruptOrdering {
        /// Stage whose ordering is broken.
        stage_id: StageId,
        /// First violation found.
        violation: DensityViolation,
    },
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Externally observable category of a [`BoardError`].
///
/// Transport layers map each kind to exactly one response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardErrorKind {
    /// A referenced row is absent.
    NotFound,
    /// The request carried nothing to change.
    NoFieldsToUpdate,
    /// The request was malformed or out of range.
    InvalidInput,
    /// The request collides with existing data.
    Conflict,
    /// An internal consistency or persistence fault.
    Internal,
}

impl BoardErrorKind {
    /// Conventional HTTP status code for this kind.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::NoFieldsToUpdate | Self::InvalidInput => 400,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

impl BoardError {
    /// Classifies the error for the boundary layer.
    #[must_use]
    pub const fn kind(&self) -> BoardErrorKind {
        match self {
            Self::TaskNotFound(_)
            | Self::StageNotFound(_)
            | Self::Store(BoardStoreError::UnknownStage(_)) => BoardErrorKind::NotFound,
            Self::NoFieldsToUpdate => BoardErrorKind::NoFieldsToUpdate,
            Self::Domain(_) | Self::PositionOutOfRange { .. } => BoardErrorKind::InvalidInput,
            Self::Store(BoardStoreError::DuplicateStageName(_)) => BoardErrorKind::Conflict,
            Self::Store(BoardStoreError::Persistence(_))
            | Self::MultipleRowsUpdated(_)
            | Self::CorruptOrdering { .. } => BoardErrorKind::Internal,
        }
    }
}
