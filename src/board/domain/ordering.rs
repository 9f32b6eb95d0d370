//! Position arithmetic for dense stage orderings.
//!
//! Every stage keeps its task positions as the contiguous range `0..n`.
//! Insertions, removals and moves are compensated by shifting a contiguous
//! run of neighbours one slot forward or backward. This module only plans
//! those shifts; stores apply each [`PositionShift`] as a single range
//! update over `(stage_id, position)`.

use super::{Placement, Position, StageId};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Inclusive range of positions; an absent `end` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionRange {
    start: Position,
    end: Option<Position>,
}

impl PositionRange {
    /// Positions `start..=end`.
    #[must_use]
    pub const fn between(start: Position, end: Position) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Positions `start..`.
    #[must_use]
    pub const fn starting_at(start: Position) -> Self {
        Self { start, end: None }
    }

    /// First position in the range.
    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    /// Last position in the range, if bounded.
    #[must_use]
    pub const fn end(&self) -> Option<Position> {
        self.end
    }

    /// Returns `true` when `position` falls inside the range.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position >= self.start && self.end.is_none_or(|end| position <= end)
    }
}

impl fmt::Display for PositionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "[{}, {}]", self.start, end),
            None => write!(f, "[{}, ..)", self.start),
        }
    }
}

/// Direction in which a run of tasks moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftDirection {
    /// Each position grows by one, opening a slot.
    Forward,
    /// Each position shrinks by one, closing a slot.
    Backward,
}

impl ShiftDirection {
    /// Signed offset applied to every affected position.
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// A single range update: every task of `stage_id` whose position lies in
/// `range` moves one slot in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionShift {
    /// Stage whose tasks are shifted.
    pub stage_id: StageId,
    /// Affected positions.
    pub range: PositionRange,
    /// Shift direction.
    pub direction: ShiftDirection,
}

impl PositionShift {
    /// Applies the shift to a single position, returning it unchanged when it
    /// falls outside the range.
    #[must_use]
    pub fn apply(&self, stage_id: StageId, position: Position) -> Position {
        if stage_id != self.stage_id || !self.range.contains(position) {
            return position;
        }
        match self.direction {
            ShiftDirection::Forward => position.next(),
            ShiftDirection::Backward => position.previous(),
        }
    }
}

impl fmt::Display for PositionShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stage {} {} by {:+}",
            self.stage_id,
            self.range,
            self.direction.delta()
        )
    }
}

/// Shifts required to relocate one task, in the order they must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    origin: Placement,
    destination: Placement,
    shifts: Vec<PositionShift>,
}

impl MovePlan {
    /// Where the task currently sits.
    #[must_use]
    pub const fn origin(&self) -> Placement {
        self.origin
    }

    /// Where the task ends up.
    #[must_use]
    pub const fn destination(&self) -> Placement {
        self.destination
    }

    /// Neighbour shifts to issue before writing the task's new placement.
    #[must_use]
    pub fn shifts(&self) -> &[PositionShift] {
        &self.shifts
    }

    /// Returns `true` when the task stays where it is.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.origin == self.destination
    }

    /// Returns `true` when the task changes stage.
    #[must_use]
    pub fn crosses_stages(&self) -> bool {
        self.origin.stage_id != self.destination.stage_id
    }
}

/// Plans the neighbour shifts for moving a task from `origin` to
/// `destination`.
///
/// Within one stage the run between the two slots slides toward the vacated
/// slot. Across stages the source stage closes the gap behind the task and
/// the destination stage opens a slot at the insertion point. A move onto its
/// own slot yields no shifts at all.
#[must_use]
pub fn plan_move(origin: Placement, destination: Placement) -> MovePlan {
    let shifts = if origin.stage_id == destination.stage_id {
        plan_same_stage(origin.stage_id, origin.position, destination.position)
    } else {
        vec![plan_removal(origin), plan_insertion(destination)]
    };
    MovePlan {
        origin,
        destination,
        shifts,
    }
}

fn plan_same_stage(stage_id: StageId, from: Position, to: Position) -> Vec<PositionShift> {
    if to < from {
        vec![PositionShift {
            stage_id,
            range: PositionRange::between(to, from.previous()),
            direction: ShiftDirection::Forward,
        }]
    } else if to > from {
        vec![PositionShift {
            stage_id,
            range: PositionRange::between(from.next(), to),
            direction: ShiftDirection::Backward,
        }]
    } else {
        Vec::new()
    }
}

/// Plans the shift that closes the gap left by removing the task at `origin`.
#[must_use]
pub const fn plan_removal(origin: Placement) -> PositionShift {
    PositionShift {
        stage_id: origin.stage_id,
        range: PositionRange::starting_at(origin.position.next()),
        direction: ShiftDirection::Backward,
    }
}

/// Plans the shift that opens a slot for a task inserted at `destination`.
#[must_use]
pub const fn plan_insertion(destination: Placement) -> PositionShift {
    PositionShift {
        stage_id: destination.stage_id,
        range: PositionRange::starting_at(destination.position),
        direction: ShiftDirection::Forward,
    }
}

/// Returns the largest valid insertion index for a move into a stage.
///
/// `destination_count` is the number of tasks currently in the destination
/// stage, including the moved task when it already lives there.
#[must_use]
pub const fn max_insertion_index(destination_count: usize, same_stage: bool) -> usize {
    if same_stage {
        destination_count.saturating_sub(1)
    } else {
        destination_count
    }
}

/// Ways a stage's positions can break density.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DensityViolation {
    /// Two or more tasks share a position.
    #[error("position {0} is held by more than one task")]
    Duplicate(Position),
    /// A position inside `0..n` is unused.
    #[error("position {0} is missing")]
    Gap(Position),
}

/// Checks that `positions` are exactly `0..n` where `n` is their count.
///
/// # Errors
///
/// Returns the first [`DensityViolation`] found: duplicates take precedence
/// over gaps.
pub fn check_density<I>(positions: I) -> Result<(), DensityViolation>
where
    I: IntoIterator<Item = Position>,
{
    let mut seen = BTreeSet::new();
    for position in positions {
        if !seen.insert(position) {
            return Err(DensityViolation::Duplicate(position));
        }
    }
    let mut expected = Position::FIRST;
    for position in seen {
        if position != expected {
            return Err(DensityViolation::Gap(expected));
        }
        expected = expected.next();
    }
    Ok(())
}
