//! Fixed-size occupancy grid with ground blocking.
//!
//! The [`SpatialGrid`] tracks where each unit stands and which cells are
//! blocked for ground movement.
//!
//! # Blocking Is Owner-Maintained
//!
//! The blocked set is **not** derived from occupancy. It is set on placement
//! for ground-blocking units and cleared when a unit leaves a cell, but
//! [`SpatialGrid::move_unit`] does not block the destination, because the grid
//! does not know whether the mover blocks ground. Moving is a two-step
//! contract:
//!
//! ```
//! use lattice::{Position, SpatialGrid};
//!
//! let mut grid: SpatialGrid<u32> = SpatialGrid::new(4, 4);
//! grid.place_unit(7, Position::new(0, 0), true).unwrap();
//!
//! // Step 1: move. The old cell is unblocked, the new one is not yet blocked.
//! grid.move_unit(7, Position::new(1, 0)).unwrap();
//! assert!(!grid.blocks_at(Position::new(0, 0)));
//! assert!(!grid.blocks_at(Position::new(1, 0)));
//!
//! // Step 2: the owner reapplies blocking for ground-blocking movers.
//! grid.set_position_blocked(Position::new(1, 0), true);
//! assert!(grid.blocks_at(Position::new(1, 0)));
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

use crate::Position;

/// Reasons a grid operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// The position lies outside the grid.
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),
    /// Another unit already stands on the position.
    #[error("position {0} is occupied by another unit")]
    Occupied(Position),
    /// The position is blocked for ground-blocking units.
    #[error("position {0} is blocked")]
    Blocked(Position),
    /// The unit has never been placed (or was removed).
    #[error("unit is not on the grid")]
    UnknownUnit,
}

/// Bounded grid mapping unit identifiers to cells.
///
/// `K` is whatever identifier the owner uses for its units. The grid keeps a
/// forward index (unit to cell) and a reverse index (cell to unit) in
/// lock-step, so both lookups are constant time.
///
/// # Invariants
///
/// - Every placed unit has exactly one position inside the grid.
/// - At most one unit stands on any cell.
/// - The blocked set is whatever the owner last made it; see the module docs.
#[derive(Clone)]
pub struct SpatialGrid<K> {
    width: u32,
    height: u32,
    positions: HashMap<K, Position>,
    occupants: HashMap<Position, K>,
    blocked: HashSet<Position>,
}

impl<K> fmt::Debug for SpatialGrid<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("units", &self.positions.len())
            .field("blocked", &self.blocked.len())
            .finish()
    }
}

impl<K> Default for SpatialGrid<K> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            positions: HashMap::new(),
            occupants: HashMap::new(),
            blocked: HashSet::new(),
        }
    }
}

impl<K> SpatialGrid<K> {
    /// Create an empty `width` x `height` grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if `pos` lies inside the grid.
    #[must_use]
    pub const fn is_valid_position(&self, pos: Position) -> bool {
        pos.is_within(self.width, self.height)
    }

    /// Returns true if `pos` is marked as ground-blocked.
    #[must_use]
    pub fn blocks_at(&self, pos: Position) -> bool {
        self.blocked.contains(&pos)
    }

    /// Mark or clear the ground-blocked flag on `pos`.
    ///
    /// This is the correction hook owners use after [`move_unit`](Self::move_unit).
    pub fn set_position_blocked(&mut self, pos: Position, blocked: bool) {
        if blocked {
            self.blocked.insert(pos);
        } else {
            self.blocked.remove(&pos);
        }
    }

    /// Number of units on the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no unit is on the grid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over the blocked cells in arbitrary order.
    pub fn blocked_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.blocked.iter().copied()
    }
}

impl<K: Copy + Eq + Hash> SpatialGrid<K> {
    /// Place a unit on `pos`.
    ///
    /// # Errors
    ///
    /// - [`GridError::OutOfBounds`] if `pos` is outside the grid
    /// - [`GridError::Occupied`] if any unit already stands there
    /// - [`GridError::Blocked`] if `blocks_ground` and the cell is blocked
    pub fn place_unit(&mut self, id: K, pos: Position, blocks_ground: bool) -> Result<(), GridError> {
        if !self.is_valid_position(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        if self.occupants.contains_key(&pos) {
            return Err(GridError::Occupied(pos));
        }
        if blocks_ground && self.blocks_at(pos) {
            return Err(GridError::Blocked(pos));
        }

        // Re-placing a known unit moves its entry rather than duplicating it.
        if let Some(previous) = self.positions.insert(id, pos) {
            self.occupants.remove(&previous);
            self.blocked.remove(&previous);
        }
        self.occupants.insert(pos, id);
        if blocks_ground {
            self.blocked.insert(pos);
        }
        Ok(())
    }

    /// Remove a unit and unblock the cell it stood on. Unknown ids are ignored.
    pub fn remove_unit(&mut self, id: K) {
        if let Some(pos) = self.positions.remove(&id) {
            self.occupants.remove(&pos);
            self.blocked.remove(&pos);
        }
    }

    /// Move a unit to `new_pos`.
    ///
    /// On success the old cell is unblocked unconditionally. The new cell is
    /// left as it was; the caller reapplies blocking for ground-blocking
    /// units via [`set_position_blocked`](Self::set_position_blocked).
    ///
    /// # Errors
    ///
    /// - [`GridError::UnknownUnit`] if `id` is not on the grid
    /// - [`GridError::OutOfBounds`] if `new_pos` is outside the grid
    /// - [`GridError::Occupied`] if a different unit stands on `new_pos`
    pub fn move_unit(&mut self, id: K, new_pos: Position) -> Result<(), GridError> {
        let Some(&old_pos) = self.positions.get(&id) else {
            return Err(GridError::UnknownUnit);
        };
        if !self.is_valid_position(new_pos) {
            return Err(GridError::OutOfBounds(new_pos));
        }
        if let Some(&occupant) = self.occupants.get(&new_pos) {
            if occupant != id {
                return Err(GridError::Occupied(new_pos));
            }
        }

        self.blocked.remove(&old_pos);
        self.occupants.remove(&old_pos);
        self.occupants.insert(new_pos, id);
        self.positions.insert(id, new_pos);
        Ok(())
    }

    /// Returns true if unit `id` currently stands on `pos`.
    #[must_use]
    pub fn is_position_occupied_by(&self, pos: Position, id: K) -> bool {
        self.positions.get(&id) == Some(&pos)
    }

    /// The unit standing on `pos`, if any.
    #[must_use]
    pub fn unit_at(&self, pos: Position) -> Option<K> {
        self.occupants.get(&pos).copied()
    }

    /// The cell unit `id` stands on, if it is on the grid.
    #[must_use]
    pub fn position_of(&self, id: K) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    /// Iterate over `(unit, position)` pairs in arbitrary order.
    pub fn units(&self) -> impl Iterator<Item = (K, Position)> + '_ {
        self.positions.iter().map(|(id, pos)| (*id, *pos))
    }
}

// =============================================================================
// Tests
// =============================================================================
