//! # Skirmish Core
//!
//! Deterministic, turn-based combat on a bounded 2D grid.
//!
//! Units are assembled from swappable capabilities (health, movement, attacks,
//! AI), placed on a [`lattice`] grid, and fight until one is left standing or
//! nobody can act. Every state change is reported as a structured event.
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): an id, a position and four capability slots
//! - **Capabilities** ([`capability`]): strategy traits and their built-ins
//! - **Archetypes** ([`archetype`]): Swordsman and Hunter factories
//! - **World** ([`world`]): grid, registry, randomness and the event journal
//! - **Simulation** ([`simulation`]): setup commands and the turn loop
//!
//! ## Usage
//!
//! ```
//! use skirmish_core::prelude::*;
//!
//! let mut sim = Simulation::new(SimulationConfig::default().with_seed(1));
//! sim.create_map(8, 8);
//! sim.spawn_swordsman(UnitId::new(1), 0, 0, 12, 3).unwrap();
//! sim.spawn_hunter(UnitId::new(2), 7, 7, 8, 2, 1, 4).unwrap();
//! sim.march(UnitId::new(1), 4, 4).unwrap();
//!
//! let summary = sim.run(200).unwrap();
//! assert!(summary.final_turn >= 1);
//! for line in sim.events() {
//!     println!("{line}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export lattice for positions and grid queries
pub use lattice;

pub mod archetype;
pub mod capability;
pub mod command;
pub mod entity;
pub mod error;
pub mod event;
pub mod simulation;
pub mod targeting;
pub mod world;

#[cfg(test)]
mod tests;

/// Turn counter. The first processed turn is 1.
pub type Turn = u64;

/// The types most callers need.
pub mod prelude {
    pub use crate::command::Command;
    pub use crate::entity::{Entity, UnitId};
    pub use crate::error::{Result, SimulationError};
    pub use crate::event::{Event, EventSink, LoggedEvent, TracingSink, WriterSink};
    pub use crate::simulation::{Outcome, Phase, RunSummary, Simulation, SimulationConfig};
    pub use crate::Turn;
    pub use lattice::Position;
}
