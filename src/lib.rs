//! Buildit board: an ordering engine for kanban-style task boards.
//!
//! Tasks live in named stages and carry a zero-based position. The engine
//! keeps each stage's positions dense while tasks are created, renamed,
//! reordered, moved between stages and deleted.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure ordering logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for transactional persistence
//! - **Adapters**: In-memory and SQLite implementations of those ports
//!
//! # Example
//!
//! ```
//! use buildit_board::board::{
//!     adapters::memory::InMemoryBoardStore,
//!     services::{BoardService, CreateTaskRequest, MoveTaskRequest},
//! };
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "multi_thread")]
//! # async fn main() -> Result<(), buildit_board::board::services::BoardError> {
//! let service = BoardService::new(Arc::new(InMemoryBoardStore::new()));
//! let todo = service.create_stage("todo").await?;
//! let first = service
//!     .create_task(CreateTaskRequest::new("write docs", todo.id()))
//!     .await?;
//! service
//!     .create_task(CreateTaskRequest::new("ship", todo.id()))
//!     .await?;
//!
//! let moved = service
//!     .move_task(MoveTaskRequest::new(first.id()).to_position(1))
//!     .await?;
//! assert_eq!(moved.position().value(), 1);
//! # Ok(())
//! # }
//! ```

pub mod board;
