//! Port contracts for board persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod store;

pub use store::{BoardStore, BoardStoreError, BoardStoreResult, BoardTransaction};

#[cfg(test)]
pub use store::MockBoardTransaction;
