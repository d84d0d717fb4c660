//! Enemy selection helpers shared by AI strategies.

use rand::seq::SliceRandom;

use crate::entity::UnitId;
use crate::world::World;

/// Every living unit other than `unit`, in shuffled order.
///
/// Candidates are collected in id order before shuffling with the world's
/// random source, so a fixed seed always yields the same order.
pub fn gather_enemies(world: &mut World, unit: UnitId) -> Vec<UnitId> {
    let mut enemies: Vec<UnitId> = world
        .entities()
        .filter(|entity| entity.id() != unit && entity.is_alive())
        .map(crate::entity::Entity::id)
        .collect();
    enemies.shuffle(world.rng_mut());
    enemies
}

/// The candidate closest to `unit` by Chebyshev distance.
///
/// Ties go to the earliest candidate in `enemies`. Returns `None` when `unit`
/// is gone or no candidate is still registered.
#[must_use]
pub fn find_nearest_enemy(world: &World, unit: UnitId, enemies: &[UnitId]) -> Option<UnitId> {
    let origin = world.unit_position(unit)?;
    let mut best: Option<(UnitId, u32)> = None;

    for &enemy in enemies {
        let Some(pos) = world.unit_position(enemy) else {
            continue;
        };
        let distance = origin.distance_to(pos);
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((enemy, distance));
        }
    }

    best.map(|(enemy, _)| enemy)
}
