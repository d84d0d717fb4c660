//! Capability strategies: the pluggable behaviour of a unit.
//!
//! Each [`Entity`](crate::entity::Entity) has up to four capability slots.
//! This module defines the trait for each slot and the concrete strategies
//! the built-in archetypes use.
//!
//! # Architecture
//!
//! | Slot     | Trait                | Built-in                          |
//! |----------|----------------------|-----------------------------------|
//! | Health   | [`HealthStrategy`]   | [`BasicHealth`]                   |
//! | Movement | [`MovementStrategy`] | [`TerrainMovement`]               |
//! | Attack   | [`AttackStrategy`]   | [`MeleeAttack`], [`RangedAttack`] |
//! | AI       | [`AiStrategy`]       | [`PreferenceAi`]                  |
//!
//! Strategies that act on the world take the acting unit's [`UnitId`] and a
//! `&mut World` rather than a reference to the unit itself. The world hands
//! out a cloned `Arc` of the strategy first, so the unit can be looked up
//! again (and mutated) while the strategy runs.
//!
//! New unit types are built by combining these strategies, or by implementing
//! the traits for new ones. No change to the world or turn loop is needed.
//!
//! [`UnitId`]: crate::entity::UnitId

pub mod ai;
pub mod attack;
pub mod health;
pub mod movement;

pub use ai::{AiStrategy, PreferenceAi};
pub use attack::{AttackKind, AttackStrategy, MeleeAttack, RangeConfig, RangedAttack};
pub use health::{BasicHealth, HealthStrategy};
pub use movement::{MovementStrategy, TerrainMovement};
