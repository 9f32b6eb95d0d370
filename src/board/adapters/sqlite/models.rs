//! Diesel row models for board persistence.

use super::schema::{stage, task};
use diesel::prelude::*;

/// Query result row for stages.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stage)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StageRow {
    /// Stage identifier.
    pub id: i64,
    /// Stage name.
    pub name: String,
}

/// Insert model for stages.
#[derive(Debug, Insertable)]
#[diesel(table_name = stage)]
pub struct NewStageRow<'a> {
    /// Stage name.
    pub name: &'a str,
}

/// Query result row for tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Task name.
    pub name: String,
    /// Owning stage.
    pub stage_id: i64,
    /// Position within the owning stage.
    pub position: i32,
}

/// Insert model for tasks.
#[derive(Debug, Insertable)]
#[diesel(table_name = task)]
pub struct NewTaskRow<'a> {
    /// Task name.
    pub name: &'a str,
    /// Owning stage.
    pub stage_id: i64,
    /// Position within the owning stage.
    pub position: i32,
}

/// Partial update of a task row; `None` columns are left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = task)]
pub struct TaskChangeset<'a> {
    /// New name.
    pub name: Option<&'a str>,
    /// New owning stage.
    pub stage_id: Option<i64>,
    /// New position.
    pub position: Option<i32>,
}
