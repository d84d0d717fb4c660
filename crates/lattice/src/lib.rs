//! # Lattice
//!
//! Bounded 2D cell grid used as the spatial substrate of the skirmish
//! simulation.
//!
//! Lattice knows nothing about units beyond an opaque, copyable identifier. It
//! answers three questions:
//!
//! - **Where is a unit?** One position per placed identifier, at most one
//!   identifier per cell.
//! - **Is a cell blocked?** A set of ground-blocked cells that the owner keeps
//!   up to date (it is never derived from occupancy).
//! - **Are two grids identical?** A deterministic state hash for replays and
//!   determinism checks.
//!
//! ## Quick Start
//!
//! ```
//! use lattice::{Position, SpatialGrid};
//!
//! let mut grid: SpatialGrid<u32> = SpatialGrid::new(5, 5);
//! grid.place_unit(1, Position::new(0, 0), true).unwrap();
//!
//! assert_eq!(grid.unit_at(Position::new(0, 0)), Some(1));
//! assert!(grid.blocks_at(Position::new(0, 0)));
//! assert_eq!(Position::new(0, 0).distance_to(Position::new(3, 1)), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;
pub mod hash;

// Re-exports for convenience
pub use grid::{GridError, SpatialGrid};
pub use hash::{hash_grid, hash_grid_into};

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell on the grid.
///
/// Coordinates are zero-based with `(0, 0)` in the top-left corner. Ordering is
/// lexicographic: first by `x`, then by `y`. Distance is Chebyshev, so a
/// diagonal step costs the same as an orthogonal one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Position {
    /// Create a position from its coordinates.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: `max(|dx|, |dy|)`.
    #[must_use]
    pub const fn distance_to(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy {
            dx
        } else {
            dy
        }
    }

    /// Returns true if the position lies inside a `width` x `height` grid.
    #[must_use]
    pub const fn is_within(self, width: u32, height: u32) -> bool {
        self.x < width && self.y < height
    }

    /// The up-to-eight surrounding cells that have non-negative coordinates.
    ///
    /// Cells past the far edge of a grid are still yielded; callers check
    /// bounds against their own dimensions.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        const OFFSETS: [(i64, i64); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];

        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let x = u32::try_from(i64::from(self.x) + dx).ok()?;
            let y = u32::try_from(i64::from(self.y) + dy).ok()?;
            Some(Position::new(x, y))
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for Position {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}
