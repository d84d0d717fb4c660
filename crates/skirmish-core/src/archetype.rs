//! Unit archetypes: preset bundles of capabilities.
//!
//! An archetype is nothing more than a factory that fills an [`Entity`]'s
//! capability slots. Adding a unit type means adding a config struct and a
//! factory here; the world and turn loop stay untouched.
//!
//! | Archetype | Health | Movement | Attacks                  | AI       |
//! |-----------|--------|----------|--------------------------|----------|
//! | Swordsman | hp     | step 1   | melee(strength)          | melee    |
//! | Hunter    | hp     | step 1   | melee(strength), ranged  | ranged   |
//!
//! A Hunter's ranged attack deals `agility` damage between distance 2 and
//! `range`, and only while nothing alive stands next to it.

use lattice::Position;
use serde::{Deserialize, Serialize};

use crate::capability::{BasicHealth, MeleeAttack, PreferenceAi, RangeConfig, RangedAttack, TerrainMovement};
use crate::entity::{Entity, UnitId};

/// Type label of [`swordsman`] units.
pub const SWORDSMAN: &str = "Swordsman";

/// Type label of [`hunter`] units.
pub const HUNTER: &str = "Hunter";

/// Closest distance a Hunter can shoot.
pub const HUNTER_MIN_RANGE: u32 = 2;

/// Stats of a melee-only unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwordsmanConfig {
    /// Starting hit points.
    pub hp: u32,
    /// Melee damage.
    pub strength: u32,
}

/// Stats of a unit that shoots first and fights up close when it must.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunterConfig {
    /// Starting hit points.
    pub hp: u32,
    /// Ranged damage.
    pub agility: u32,
    /// Melee damage.
    pub strength: u32,
    /// Farthest shooting distance.
    pub range: u32,
}

/// Build a Swordsman.
#[must_use]
pub fn swordsman(id: UnitId, position: Position, config: SwordsmanConfig) -> Entity {
    Entity::new(id, position, SWORDSMAN)
        .with_health(BasicHealth::new(config.hp))
        .with_movement(TerrainMovement::new(1))
        .with_attack(MeleeAttack::new(config.strength))
        .with_ai(PreferenceAi::melee())
}

/// Build a Hunter.
#[must_use]
pub fn hunter(id: UnitId, position: Position, config: HunterConfig) -> Entity {
    Entity::new(id, position, HUNTER)
        .with_health(BasicHealth::new(config.hp))
        .with_movement(TerrainMovement::new(1))
        .with_attack(MeleeAttack::new(config.strength))
        .with_attack(RangedAttack::new(RangeConfig {
            damage: config.agility,
            min_range: HUNTER_MIN_RANGE,
            max_range: config.range,
            require_clear_adjacency: true,
        }))
        .with_ai(PreferenceAi::ranged())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::AttackKind;

    #[test]
    fn swordsman_slots() {
        let unit = swordsman(
            UnitId::new(1),
            Position::new(2, 3),
            SwordsmanConfig { hp: 12, strength: 4 },
        );

        assert_eq!(unit.type_name(), SWORDSMAN);
        assert_eq!(unit.position(), Position::new(2, 3));
        assert_eq!(unit.hit_points(), Some(12));
        assert!(unit.blocks_ground());
        assert_eq!(unit.movement().map(|m| m.step_size()), Some(1));

        let attacks: Vec<_> = unit.attacks().iter().map(|a| (a.kind(), a.damage())).collect();
        assert_eq!(attacks, vec![(AttackKind::Melee, 4)]);
        assert!(unit.ai().is_some());
    }

    #[test]
    fn hunter_slots() {
        let unit = hunter(
            UnitId::new(2),
            Position::new(0, 0),
            HunterConfig {
                hp: 8,
                agility: 3,
                strength: 1,
                range: 5,
            },
        );

        assert_eq!(unit.type_name(), HUNTER);
        let attacks: Vec<_> = unit.attacks().iter().map(|a| (a.kind(), a.damage())).collect();
        assert_eq!(
            attacks,
            vec![(AttackKind::Melee, 1), (AttackKind::Ranged, 3)]
        );
    }
}
