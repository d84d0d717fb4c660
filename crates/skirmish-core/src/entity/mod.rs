//! Entity module: units and their capability slots.
//!
//! This module provides the core unit types for the skirmish simulation:
//! - [`UnitId`]: Unique identifier for units
//! - [`Entity`]: Identity (id, position, type label) plus four optional
//!   capability slots
//!
//! # Architecture
//!
//! Behaviour is composed, never inherited. An `Entity` holds up to one
//! capability per axis:
//! - Health ([`HealthStrategy`]): hit points and attack vetoes
//! - Movement ([`MovementStrategy`]): stepping toward a target, ground blocking
//! - Attacks ([`AttackStrategy`]): zero or more melee or ranged attacks
//! - AI ([`AiStrategy`]): the per-turn decision
//!
//! Unit types ("archetypes") are assembled by the factory functions in
//! [`crate::archetype`].
//!
//! # Example
//!
//! ```
//! use skirmish_core::entity::{Entity, UnitId};
//! use skirmish_core::capability::{BasicHealth, MeleeAttack, TerrainMovement};
//! use lattice::Position;
//!
//! let unit = Entity::new(UnitId::new(7), Position::new(1, 2), "Militia")
//!     .with_health(BasicHealth::new(5))
//!     .with_movement(TerrainMovement::new(1))
//!     .with_attack(MeleeAttack::new(2));
//!
//! assert!(unit.is_alive());
//! assert!(unit.can_move());
//! assert_eq!(unit.hit_points(), Some(5));
//! ```

use std::fmt;
use std::sync::Arc;

use lattice::Position;
use serde::{Deserialize, Serialize};

use crate::capability::{AiStrategy, AttackStrategy, HealthStrategy, MovementStrategy};

/// Unique identifier for a unit.
///
/// `UnitId` is a newtype wrapper around `u32`. Ids are chosen by whoever
/// issues the spawn command and must be unique within a map.
///
/// # Ordering
///
/// Ids are ordered by their numeric value. The world registry iterates in this
/// order, which keeps enemy enumeration reproducible under a fixed seed.
///
/// # Example
///
/// ```
/// use skirmish_core::entity::UnitId;
///
/// let a = UnitId::new(1);
/// let b = UnitId::new(2);
///
/// assert!(a < b);
/// assert_eq!(a.as_u32(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new `UnitId` from a raw `u32` value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` value of this identifier.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UnitId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

impl From<UnitId> for u32 {
    fn from(id: UnitId) -> Self {
        id.0
    }
}

/// A unit on the battlefield.
///
/// An `Entity` combines:
/// - A unique [`UnitId`], stable for the unit's lifetime
/// - Its current [`Position`]
/// - A human-readable type label ("Swordsman", "Hunter", ...)
/// - Optional capability slots
///
/// # Invariants
///
/// - Without Health the unit is immortal: [`is_alive`](Self::is_alive) is
///   always true.
/// - Without Movement the unit cannot move and blocks ground.
/// - With Movement, ground blocking follows the movement strategy.
///
/// Movement, attack and AI strategies are configuration-only and held behind
/// `Arc` so the world can clone a handle out of the unit before invoking the
/// strategy against itself. Health carries per-unit state and is boxed.
#[derive(Debug)]
pub struct Entity {
    id: UnitId,
    position: Position,
    type_name: String,
    health: Option<Box<dyn HealthStrategy>>,
    movement: Option<Arc<dyn MovementStrategy>>,
    attacks: Vec<Arc<dyn AttackStrategy>>,
    ai: Option<Arc<dyn AiStrategy>>,
}

impl Entity {
    /// Creates a unit with no capabilities.
    #[must_use]
    pub fn new(id: UnitId, position: Position, type_name: impl Into<String>) -> Self {
        Self {
            id,
            position,
            type_name: type_name.into(),
            health: None,
            movement: None,
            attacks: Vec::new(),
            ai: None,
        }
    }

    /// Builder: fill the Health slot.
    #[must_use]
    pub fn with_health(mut self, health: impl HealthStrategy + 'static) -> Self {
        self.set_health(Box::new(health));
        self
    }

    /// Builder: fill the Movement slot.
    #[must_use]
    pub fn with_movement(mut self, movement: impl MovementStrategy + 'static) -> Self {
        self.set_movement(Arc::new(movement));
        self
    }

    /// Builder: append an attack.
    #[must_use]
    pub fn with_attack(mut self, attack: impl AttackStrategy + 'static) -> Self {
        self.add_attack(Arc::new(attack));
        self
    }

    /// Builder: fill the AI slot.
    #[must_use]
    pub fn with_ai(mut self, ai: impl AiStrategy + 'static) -> Self {
        self.set_ai(Arc::new(ai));
        self
    }

    /// Returns the unit's identifier.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Returns the unit's current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Overwrite the stored position.
    ///
    /// This does not touch the grid; the world keeps both in sync.
    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Returns the unit's type label.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Replace the Health slot.
    pub fn set_health(&mut self, health: Box<dyn HealthStrategy>) {
        self.health = Some(health);
    }

    /// The Health capability, if any.
    #[must_use]
    pub fn health(&self) -> Option<&dyn HealthStrategy> {
        self.health.as_deref()
    }

    /// Mutable access to the Health capability, if any.
    #[must_use]
    pub fn health_mut(&mut self) -> Option<&mut (dyn HealthStrategy + 'static)> {
        self.health.as_deref_mut()
    }

    /// Replace the Movement slot.
    pub fn set_movement(&mut self, movement: Arc<dyn MovementStrategy>) {
        self.movement = Some(movement);
    }

    /// The Movement capability, if any.
    #[must_use]
    pub fn movement(&self) -> Option<&Arc<dyn MovementStrategy>> {
        self.movement.as_ref()
    }

    /// Append an attack. Attacks are tried in the order they were added.
    pub fn add_attack(&mut self, attack: Arc<dyn AttackStrategy>) {
        self.attacks.push(attack);
    }

    /// All attacks in declaration order.
    #[must_use]
    pub fn attacks(&self) -> &[Arc<dyn AttackStrategy>] {
        &self.attacks
    }

    /// Replace the AI slot.
    pub fn set_ai(&mut self, ai: Arc<dyn AiStrategy>) {
        self.ai = Some(ai);
    }

    /// The AI capability, if any.
    #[must_use]
    pub fn ai(&self) -> Option<&Arc<dyn AiStrategy>> {
        self.ai.as_ref()
    }

    /// Returns true unless the unit has Health and it reports death.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health.as_ref().map_or(true, |health| health.is_alive())
    }

    /// Hit points floored at zero, or `None` for immortal units.
    #[must_use]
    pub fn hit_points(&self) -> Option<u32> {
        self.health.as_ref().map(|health| health.hit_points())
    }

    /// Returns true if the unit's cell should block other ground units.
    #[must_use]
    pub fn blocks_ground(&self) -> bool {
        self.movement
            .as_ref()
            .map_or(true, |movement| movement.blocks_ground())
    }

    /// Returns true if the unit has a Movement capability.
    #[must_use]
    pub fn can_move(&self) -> bool {
        self.movement.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{AttackKind, BasicHealth, MeleeAttack, PreferenceAi, TerrainMovement};

    mod unit_id_tests {
        use super::*;

        #[test]
        fn ordering() {
            let mut ids = vec![UnitId::new(3), UnitId::new(1), UnitId::new(2)];
            ids.sort();
            assert_eq!(ids, vec![UnitId::new(1), UnitId::new(2), UnitId::new(3)]);
        }

        #[test]
        fn debug_and_display() {
            let id = UnitId::new(42);
            assert_eq!(format!("{id:?}"), "UnitId(42)");
            assert_eq!(id.to_string(), "42");
        }

        #[test]
        fn conversions() {
            let id: UnitId = 9u32.into();
            let raw: u32 = id.into();
            assert_eq!(raw, 9);
        }

        #[test]
        fn serializes_as_bare_number() {
            assert_eq!(serde_json::to_string(&UnitId::new(12)).unwrap(), "12");
        }
    }

    mod entity_tests {
        use super::*;

        #[test]
        fn bare_entity_is_immortal_and_blocking() {
            let unit = Entity::new(UnitId::new(1), Position::new(0, 0), "Totem");

            assert!(unit.is_alive());
            assert!(unit.blocks_ground());
            assert!(!unit.can_move());
            assert_eq!(unit.hit_points(), None);
            assert!(unit.attacks().is_empty());
            assert!(unit.ai().is_none());
        }

        #[test]
        fn health_slot_drives_liveness() {
            let mut unit =
                Entity::new(UnitId::new(1), Position::new(0, 0), "Militia").with_health(BasicHealth::new(3));
            assert!(unit.is_alive());

            unit.health_mut().unwrap().apply_damage(3);
            assert!(!unit.is_alive());
            assert_eq!(unit.hit_points(), Some(0));
        }

        #[test]
        fn movement_slot_drives_blocking() {
            let walker = Entity::new(UnitId::new(1), Position::new(0, 0), "Walker")
                .with_movement(TerrainMovement::new(1));
            assert!(walker.blocks_ground());
            assert!(walker.can_move());

            let flyer = Entity::new(UnitId::new(2), Position::new(0, 0), "Flyer")
                .with_movement(TerrainMovement::new(2).with_ground_blocking(false));
            assert!(!flyer.blocks_ground());
        }

        #[test]
        fn attacks_keep_declaration_order() {
            let unit = Entity::new(UnitId::new(1), Position::new(0, 0), "Brute")
                .with_attack(MeleeAttack::new(1))
                .with_attack(MeleeAttack::new(7));

            let damages: Vec<_> = unit.attacks().iter().map(|a| a.damage()).collect();
            assert_eq!(damages, vec![1, 7]);
            assert!(unit.attacks().iter().all(|a| a.kind() == AttackKind::Melee));
        }

        #[test]
        fn set_position_only_changes_stored_position() {
            let mut unit = Entity::new(UnitId::new(1), Position::new(0, 0), "Scout")
                .with_ai(PreferenceAi::melee());
            unit.set_position(Position::new(3, 1));
            assert_eq!(unit.position(), Position::new(3, 1));
            assert_eq!(unit.type_name(), "Scout");
        }
    }
}
