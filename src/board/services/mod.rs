//! Application services for board orchestration.

mod board;
mod error;

pub use board::{BoardService, CreateTaskRequest, MoveTaskRequest};
pub use error::{BoardError, BoardErrorKind, BoardResult};
