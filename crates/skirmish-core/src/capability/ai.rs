//! AI capability: the per-turn decision of a unit.

use std::fmt;

use crate::capability::AttackKind;
use crate::entity::UnitId;
use crate::targeting::{find_nearest_enemy, gather_enemies};
use crate::world::World;
use crate::Turn;

/// Decides what a unit does with its turn.
pub trait AiStrategy: fmt::Debug + Send + Sync {
    /// Take at most one action for `unit`. Returns true if the unit acted.
    fn update(&self, unit: UnitId, world: &mut World, turn: Turn) -> bool;
}

/// Attack by kind preference, otherwise close in on the nearest enemy.
///
/// Each turn:
/// 1. Gather every other living unit in shuffled order.
/// 2. For each preferred [`AttackKind`] in order, try every enemy with
///    attacks of exactly that kind. The first hit ends the turn.
/// 3. Otherwise step toward the nearest enemy.
///
/// # Example
///
/// ```
/// use skirmish_core::capability::{AttackKind, PreferenceAi};
///
/// let archer = PreferenceAi::ranged();
/// assert_eq!(archer.preferences(), &[AttackKind::Ranged, AttackKind::Melee]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceAi {
    preferences: Vec<AttackKind>,
}

impl PreferenceAi {
    /// AI with an explicit preference order.
    #[must_use]
    pub fn new(preferences: Vec<AttackKind>) -> Self {
        Self { preferences }
    }

    /// Melee only.
    #[must_use]
    pub fn melee() -> Self {
        Self::new(vec![AttackKind::Melee])
    }

    /// Ranged first, melee as a fallback.
    #[must_use]
    pub fn ranged() -> Self {
        Self::new(vec![AttackKind::Ranged, AttackKind::Melee])
    }

    /// Attack kinds in the order they are tried.
    #[must_use]
    pub fn preferences(&self) -> &[AttackKind] {
        &self.preferences
    }
}

impl AiStrategy for PreferenceAi {
    fn update(&self, unit: UnitId, world: &mut World, turn: Turn) -> bool {
        let enemies = gather_enemies(world, unit);

        for &kind in &self.preferences {
            for &enemy in &enemies {
                if world.execute_attack_of_kind(unit, enemy, turn, kind) {
                    return true;
                }
            }
        }

        let Some(goal) = find_nearest_enemy(world, unit, &enemies)
            .and_then(|nearest| world.unit_position(nearest))
        else {
            return false;
        };
        world.move_entity_towards(unit, goal, turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{hunter, swordsman, HunterConfig, SwordsmanConfig};
    use crate::event::Event;
    use crate::tests::helpers::seeded_world;
    use lattice::Position;

    const SWORD: SwordsmanConfig = SwordsmanConfig { hp: 10, strength: 3 };
    const BOW: HunterConfig = HunterConfig {
        hp: 10,
        agility: 2,
        strength: 5,
        range: 4,
    };

    #[test]
    fn melee_ai_strikes_adjacent_enemy() {
        let mut world = seeded_world(5, 5);
        world.add_entity(swordsman(UnitId::new(1), Position::new(0, 0), SWORD)).unwrap();
        world.add_entity(swordsman(UnitId::new(2), Position::new(1, 1), SWORD)).unwrap();

        assert!(PreferenceAi::melee().update(UnitId::new(1), &mut world, 1));
        assert_eq!(world.entity(UnitId::new(2)).unwrap().hit_points(), Some(7));
    }

    #[test]
    fn melee_ai_approaches_distant_enemy() {
        let mut world = seeded_world(6, 6);
        world.add_entity(swordsman(UnitId::new(1), Position::new(0, 0), SWORD)).unwrap();
        world.add_entity(swordsman(UnitId::new(2), Position::new(4, 4), SWORD)).unwrap();

        assert!(PreferenceAi::melee().update(UnitId::new(1), &mut world, 1));
        assert_eq!(world.unit_position(UnitId::new(1)), Some(Position::new(1, 1)));
    }

    #[test]
    fn ranged_ai_prefers_the_bow() {
        let mut world = seeded_world(8, 8);
        world.add_entity(hunter(UnitId::new(1), Position::new(0, 0), BOW)).unwrap();
        world.add_entity(swordsman(UnitId::new(2), Position::new(3, 0), SWORD)).unwrap();

        assert!(PreferenceAi::ranged().update(UnitId::new(1), &mut world, 1));
        let damage = world.events().iter().find_map(|logged| match logged.event {
            Event::UnitAttacked { damage, .. } => Some(damage),
            _ => None,
        });
        assert_eq!(damage, Some(BOW.agility));
    }

    #[test]
    fn ranged_ai_falls_back_to_melee_when_engaged() {
        let mut world = seeded_world(8, 8);
        world.add_entity(hunter(UnitId::new(1), Position::new(0, 0), BOW)).unwrap();
        world.add_entity(swordsman(UnitId::new(2), Position::new(1, 0), SWORD)).unwrap();

        assert!(PreferenceAi::ranged().update(UnitId::new(1), &mut world, 1));
        assert_eq!(
            world.entity(UnitId::new(2)).unwrap().hit_points(),
            Some(SWORD.hp - BOW.strength)
        );
    }

    #[test]
    fn lone_unit_does_nothing() {
        let mut world = seeded_world(4, 4);
        world.add_entity(swordsman(UnitId::new(1), Position::new(2, 2), SWORD)).unwrap();

        assert!(!PreferenceAi::melee().update(UnitId::new(1), &mut world, 1));
        assert!(world.events().iter().all(|logged| !matches!(logged.event, Event::UnitMoved { .. })));
    }
}
