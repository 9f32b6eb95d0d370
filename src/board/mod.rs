//! Kanban board ordering engine.
//!
//! Stages own tasks, and every stage keeps its tasks at the dense positions
//! `0..n`. Creating, moving and deleting a task shifts its neighbours so the
//! ordering stays dense, all within a single store transaction. The module
//! follows hexagonal architecture:
//!
//! - Domain types and shift planning in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
