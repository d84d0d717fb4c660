//! State hashing for determinism verification.
//!
//! Two grids that went through the same placements and moves hash to the same
//! value, regardless of the iteration order of their internal hash maps.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::SpatialGrid;

/// Compute a deterministic hash of grid state.
///
/// This hash includes:
/// - Dimensions
/// - Every `(unit, position)` pair, sorted by unit
/// - Every blocked cell, sorted by position
#[must_use]
pub fn hash_grid<K: Copy + Eq + Hash + Ord>(grid: &SpatialGrid<K>) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_grid_into(grid, &mut hasher);
    hasher.finish()
}

/// Feed grid state into an existing hasher.
///
/// Used by owners that hash the grid as part of a larger state.
pub fn hash_grid_into<K, H>(grid: &SpatialGrid<K>, hasher: &mut H)
where
    K: Copy + Eq + Hash + Ord,
    H: Hasher,
{
    grid.width().hash(hasher);
    grid.height().hash(hasher);

    let mut units: Vec<_> = grid.units().collect();
    units.sort_unstable();
    units.len().hash(hasher);
    for (id, pos) in units {
        id.hash(hasher);
        pos.hash(hasher);
    }

    let mut blocked: Vec<_> = grid.blocked_cells().collect();
    blocked.sort_unstable();
    blocked.len().hash(hasher);
    for pos in blocked {
        pos.hash(hasher);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_identical_histories_hash_equal() {
        let build = || {
            let mut grid: SpatialGrid<u32> = SpatialGrid::new(8, 8);
            for id in 0..6 {
                grid.place_unit(id, Position::new(id, id), id % 2 == 0).unwrap();
            }
            grid.move_unit(3, Position::new(7, 0)).unwrap();
            grid
        };

        assert_eq!(hash_grid(&build()), hash_grid(&build()));
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut a: SpatialGrid<u32> = SpatialGrid::new(4, 4);
        a.place_unit(1, Position::new(0, 0), true).unwrap();
        a.place_unit(2, Position::new(3, 3), true).unwrap();

        let mut b: SpatialGrid<u32> = SpatialGrid::new(4, 4);
        b.place_unit(2, Position::new(3, 3), true).unwrap();
        b.place_unit(1, Position::new(0, 0), true).unwrap();

        assert_eq!(hash_grid(&a), hash_grid(&b));
    }

    #[test]
    fn test_blocking_changes_hash() {
        let mut grid: SpatialGrid<u32> = SpatialGrid::new(4, 4);
        grid.place_unit(1, Position::new(1, 1), true).unwrap();
        let before = hash_grid(&grid);

        grid.set_position_blocked(Position::new(1, 1), false);
        assert_ne!(before, hash_grid(&grid));
    }

    #[test]
    fn test_dimensions_change_hash() {
        let small: SpatialGrid<u32> = SpatialGrid::new(4, 4);
        let large: SpatialGrid<u32> = SpatialGrid::new(4, 5);
        assert_ne!(hash_grid(&small), hash_grid(&large));
    }
}
