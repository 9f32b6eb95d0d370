//! In-memory adapters for tests and embedding callers.

mod store;

pub use store::InMemoryBoardStore;
