//! SQLite adapters for board persistence.
//!
//! Built on Diesel with an r2d2 pool. Every operation runs in an `IMMEDIATE`
//! transaction so concurrent writers are serialized by the database.

mod config;
mod models;
mod schema;
mod store;
mod transaction;

pub use config::{
    BUSY_TIMEOUT_MS_VAR, DATABASE_PATH_VAR, MAX_CONNECTIONS_VAR, StoreConfig, StoreConfigError,
};
pub use store::{BoardSqlitePool, CREATE_SCHEMA_SQL, SqliteBoardStore};
