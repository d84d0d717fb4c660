//! Movement capability: stepping toward a target cell.

use std::fmt;

use lattice::Position;

use crate::entity::UnitId;
use crate::world::World;
use crate::Turn;

/// How a unit moves across the grid.
pub trait MovementStrategy: fmt::Debug + Send + Sync {
    /// Take at most one step from `unit`'s position toward `target`.
    ///
    /// Returns true if the unit changed cell.
    fn advance(&self, unit: UnitId, world: &mut World, target: Position, turn: Turn) -> bool;

    /// Returns true if the unit's cell blocks other ground units.
    fn blocks_ground(&self) -> bool;

    /// Maximum cells travelled per axis per step.
    fn step_size(&self) -> u32;
}

/// Ground movement with a fixed per-axis step.
///
/// Each axis advances independently by up to `step` cells and never passes the
/// target's coordinate, so diagonal approach is as fast as straight approach.
///
/// # Example
///
/// ```
/// use skirmish_core::capability::{MovementStrategy, TerrainMovement};
///
/// let walk = TerrainMovement::new(1);
/// assert!(walk.blocks_ground());
///
/// let glide = TerrainMovement::new(3).with_ground_blocking(false);
/// assert_eq!(glide.step_size(), 3);
/// assert!(!glide.blocks_ground());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainMovement {
    step: u32,
    blocks_ground: bool,
}

impl TerrainMovement {
    /// Ground-blocking movement with the given step.
    #[must_use]
    pub const fn new(step: u32) -> Self {
        Self {
            step,
            blocks_ground: true,
        }
    }

    /// Builder: choose whether the unit blocks ground.
    #[must_use]
    pub const fn with_ground_blocking(mut self, blocks_ground: bool) -> Self {
        self.blocks_ground = blocks_ground;
        self
    }

    /// The cell one step from `from` toward `to`.
    #[must_use]
    pub fn next_cell(&self, from: Position, to: Position) -> Position {
        Position::new(
            step_axis(from.x, to.x, self.step),
            step_axis(from.y, to.y, self.step),
        )
    }
}

fn step_axis(from: u32, to: u32, step: u32) -> u32 {
    if to > from {
        from + step.min(to - from)
    } else {
        from - step.min(from - to)
    }
}

impl MovementStrategy for TerrainMovement {
    fn advance(&self, unit: UnitId, world: &mut World, target: Position, turn: Turn) -> bool {
        let Some(current) = world.unit_position(unit) else {
            return false;
        };
        if current == target || self.step == 0 {
            return false;
        }

        let destination = self.next_cell(current, target);
        world.try_move(unit, destination, turn, false)
    }

    fn blocks_ground(&self) -> bool {
        self.blocks_ground
    }

    fn step_size(&self) -> u32 {
        self.step
    }
}
