//! Attack capability: melee and ranged strikes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::UnitId;
use crate::world::World;
use crate::Turn;

/// Broad classification of an attack, used for AI preferences and defensive
/// vetoes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    /// Adjacent strike.
    Melee,
    /// Strike at a distance.
    Ranged,
}

impl fmt::Display for AttackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Melee => f.write_str("melee"),
            Self::Ranged => f.write_str("ranged"),
        }
    }
}

/// One way a unit can hurt another.
pub trait AttackStrategy: fmt::Debug + Send + Sync {
    /// The attack's classification.
    fn kind(&self) -> AttackKind;

    /// Damage dealt on a successful strike.
    fn damage(&self) -> u32;

    /// Try to strike `target`. Returns true if damage was dealt.
    ///
    /// A strike that is out of range or otherwise not allowed returns false
    /// and leaves the world untouched.
    fn attack(&self, attacker: UnitId, target: UnitId, world: &mut World, turn: Turn) -> bool;
}

/// Strike an adjacent living unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeleeAttack {
    damage: u32,
}

impl MeleeAttack {
    /// Melee strike dealing `damage`.
    #[must_use]
    pub const fn new(damage: u32) -> Self {
        Self { damage }
    }
}

impl AttackStrategy for MeleeAttack {
    fn kind(&self) -> AttackKind {
        AttackKind::Melee
    }

    fn damage(&self) -> u32 {
        self.damage
    }

    fn attack(&self, attacker: UnitId, target: UnitId, world: &mut World, turn: Turn) -> bool {
        let (Some(from), Some(victim)) = (world.entity(attacker), world.entity(target)) else {
            return false;
        };
        if !victim.is_alive() || from.position().distance_to(victim.position()) != 1 {
            return false;
        }

        world.apply_damage(attacker, target, i64::from(self.damage), turn);
        true
    }
}

/// Parameters of a [`RangedAttack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConfig {
    /// Damage dealt on a hit.
    pub damage: u32,
    /// Closest distance the attack can reach.
    pub min_range: u32,
    /// Farthest distance the attack can reach.
    pub max_range: u32,
    /// Refuse to fire while any other living unit stands next to the attacker.
    pub require_clear_adjacency: bool,
}

/// Strike a living unit within a distance band.
///
/// # Example
///
/// ```
/// use skirmish_core::capability::{AttackStrategy, RangeConfig, RangedAttack};
///
/// let bow = RangedAttack::new(RangeConfig {
///     damage: 3,
///     min_range: 4,
///     max_range: 2,
///     require_clear_adjacency: true,
/// });
///
/// // A maximum below the minimum is raised to it.
/// assert_eq!(bow.range(), (4, 4));
/// assert_eq!(bow.damage(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangedAttack {
    config: RangeConfig,
}

impl RangedAttack {
    /// Ranged strike with the given parameters.
    #[must_use]
    pub fn new(mut config: RangeConfig) -> Self {
        config.max_range = config.max_range.max(config.min_range);
        Self { config }
    }

    /// Inclusive `(min, max)` distance band.
    #[must_use]
    pub const fn range(&self) -> (u32, u32) {
        (self.config.min_range, self.config.max_range)
    }

    /// Returns true if no other living unit occupies a cell next to `attacker`.
    fn has_clear_adjacency(attacker: UnitId, world: &World) -> bool {
        let Some(center) = world.unit_position(attacker) else {
            return false;
        };
        let grid = world.grid();

        center
            .neighbors()
            .filter(|cell| grid.is_valid_position(*cell))
            .filter_map(|cell| grid.unit_at(cell))
            .filter(|occupant| *occupant != attacker)
            .all(|occupant| world.entity(occupant).map_or(true, |e| !e.is_alive()))
    }
}

impl AttackStrategy for RangedAttack {
    fn kind(&self) -> AttackKind {
        AttackKind::Ranged
    }

    fn damage(&self) -> u32 {
        self.config.damage
    }

    fn attack(&self, attacker: UnitId, target: UnitId, world: &mut World, turn: Turn) -> bool {
        let (Some(from), Some(victim)) = (world.entity(attacker), world.entity(target)) else {
            return false;
        };
        if !victim.is_alive() {
            return false;
        }
        if self.config.require_clear_adjacency && !Self::has_clear_adjacency(attacker, world) {
            return false;
        }

        let distance = from.position().distance_to(victim.position());
        let (mut min, mut max) = self.range();
        if let Some(health) = victim.health() {
            if !health.can_be_attacked_by(self.kind()) {
                return false;
            }
            min = health.modified_range(min, self.kind());
            max = health.modified_range(max, self.kind());
        }
        if distance < min || distance > max {
            return false;
        }

        world.apply_damage(attacker, target, i64::from(self.config.damage), turn);
        true
    }
}
