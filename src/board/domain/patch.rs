//! Partial task updates.
//!
//! A patch distinguishes "field not supplied" from any supplied value, so a
//! caller that omits a field never overwrites it.

use super::{Placement, Position, StageId, TaskName};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single field of a partial update: either absent or set to a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldUpdate<T> {
    /// The caller did not supply the field; keep the stored value.
    #[default]
    Absent,
    /// The caller supplied a new value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Returns `true` when the field was not supplied.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` when the field carries a value.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Borrows the supplied value, if any.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Converts into an `Option`, discarding the absent/present tag.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Set)
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => value.serialize(serializer),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

/// A field that appears in the input is always `Set`; omitted fields fall
/// back to `Absent` through `#[serde(default)]` on the containing struct.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Set)
    }
}

/// Partial update of a task's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New task name.
    #[serde(default, skip_serializing_if = "FieldUpdate::is_absent")]
    pub name: FieldUpdate<TaskName>,
    /// Destination stage.
    #[serde(default, skip_serializing_if = "FieldUpdate::is_absent")]
    pub stage_id: FieldUpdate<StageId>,
    /// Destination position.
    #[serde(default, alias = "to_index", skip_serializing_if = "FieldUpdate::is_absent")]
    pub position: FieldUpdate<Position>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the task name.
    #[must_use]
    pub fn with_name(mut self, name: TaskName) -> Self {
        self.name = FieldUpdate::Set(name);
        self
    }

    /// Sets the destination stage.
    #[must_use]
    pub fn with_stage(mut self, stage_id: StageId) -> Self {
        self.stage_id = FieldUpdate::Set(stage_id);
        self
    }

    /// Sets the destination position.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = FieldUpdate::Set(position);
        self
    }

    /// Sets stage and position together.
    #[must_use]
    pub fn with_placement(self, placement: Placement) -> Self {
        self.with_stage(placement.stage_id)
            .with_position(placement.position)
    }

    /// Returns `true` when no field is supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_absent() && self.stage_id.is_absent() && self.position.is_absent()
    }

    /// Returns `true` when the patch relocates the task.
    #[must_use]
    pub const fn moves(&self) -> bool {
        self.stage_id.is_set() || self.position.is_set()
    }
}
