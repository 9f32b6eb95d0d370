//! Domain model for the task board.
//!
//! Stages own tasks; each stage keeps its tasks in a dense, zero-based
//! ordering. The [`ordering`] module plans the position shifts that keep it
//! dense. Nothing here touches storage.

mod error;
mod ids;
pub mod ordering;
mod patch;
mod stage;
mod task;

pub use error::BoardDomainError;
pub use ids::{Position, StageId, TaskId};
pub use ordering::{
    DensityViolation, MovePlan, PositionRange, PositionShift, ShiftDirection, check_density,
    plan_move, plan_removal,
};
pub use patch::{FieldUpdate, TaskPatch};
pub use stage::{Stage, StageDetail, StageName, TaskOrdering};
pub use task::{PersistedTaskData, Placement, Task, TaskName};
