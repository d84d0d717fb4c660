//! Simulation: setup commands, marches and the turn loop.
//!
//! The `Simulation` struct drives a [`World`] through a small lifecycle:
//!
//! ```text
//! Setup --create_map--> Ready --run--> Running --> Ended
//!   ^                     |                          |
//!   +----- create_map ----+------- create_map -------+
//! ```
//!
//! Units are spawned and march orders issued while `Ready`. [`Simulation::run`]
//! then processes turns until one side is left, nobody can act, or the turn
//! cap is reached.
//!
//! # Turn processing
//!
//! Each turn, every unit in spawn order (skipping units that died earlier in
//! the turn) either:
//! 1. takes one step of its march, finishing the march on arrival, or
//! 2. when it has no march or could not step, lets its AI decide.
//!
//! After the sweep, marches of dead units are dropped and dead units are
//! removed from the world.
//!
//! # Determinism
//!
//! All randomness comes from a [`ChaCha8Rng`] seeded from
//! [`SimulationConfig::seed`]. Units are stored in a `BTreeMap` so iteration
//! order never depends on hashing. Two simulations with the same seed and the
//! same commands produce identical event streams.
//!
//! # Example
//!
//! ```
//! use skirmish_core::simulation::{Outcome, Simulation, SimulationConfig};
//! use skirmish_core::entity::UnitId;
//!
//! let mut sim = Simulation::new(SimulationConfig::default().with_seed(42));
//! sim.create_map(5, 5);
//! sim.spawn_swordsman(UnitId::new(1), 0, 0, 10, 5).unwrap();
//! sim.spawn_swordsman(UnitId::new(2), 1, 0, 10, 5).unwrap();
//!
//! let summary = sim.run_to_completion().unwrap();
//! assert_eq!(summary.outcome, Outcome::Decided);
//! assert_eq!(summary.survivors, 1);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use lattice::Position;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::archetype::{hunter, swordsman, HunterConfig, SwordsmanConfig};
use crate::command::Command;
use crate::entity::{Entity, UnitId};
use crate::error::{Result, SimulationError};
use crate::event::{Event, EventSink, LoggedEvent};
use crate::world::World;
use crate::Turn;

// =============================================================================
// Configuration
// =============================================================================

/// Knobs for a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the random source. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Highest turn [`Simulation::run_to_completion`] will process.
    pub max_turns: Turn,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_turns: Turn::from(u32::MAX),
        }
    }
}

impl SimulationConfig {
    /// Builder: fix the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: cap the number of turns.
    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: Turn) -> Self {
        self.max_turns = max_turns;
        self
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Where a [`Simulation`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No map yet.
    Setup,
    /// Map created; accepting spawns and marches.
    Ready,
    /// Inside [`Simulation::run`].
    Running,
    /// A run finished. Create a new map to start over.
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Setup => "in setup",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// At most one living unit remained.
    Decided,
    /// A whole turn passed without any unit acting.
    Stalemate,
    /// The turn cap was reached.
    TurnLimit,
}

/// Result of [`Simulation::run`], mirroring the `SIMULATION_ENDED` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Turn counter when the loop stopped.
    pub final_turn: Turn,
    /// Living units at the end.
    pub survivors: usize,
    /// Turns fully processed.
    pub total_turns: Turn,
    /// Why the loop stopped.
    pub outcome: Outcome,
}

// =============================================================================
// Simulation
// =============================================================================

/// A battle: the world plus march orders and the turn counter.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    march_targets: BTreeMap<UnitId, Position>,
    turn: Turn,
    phase: Phase,
}

impl Simulation {
    /// Creates a simulation with no map.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            world: World::new(config.rng()),
            config,
            march_targets: BTreeMap::new(),
            turn: 1,
            phase: Phase::Setup,
        }
    }

    /// The configuration this simulation was built with.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Start over on an empty `width` x `height` map.
    ///
    /// Allowed in every phase. Units, marches and the turn counter are reset;
    /// the event journal and sinks are kept.
    pub fn create_map(&mut self, width: u32, height: u32) {
        self.world.reset(width, height);
        self.march_targets.clear();
        self.turn = 1;
        self.phase = Phase::Ready;
    }

    /// Spawn a [`swordsman`].
    ///
    /// # Errors
    ///
    /// See [`spawn`](Self::spawn).
    pub fn spawn_swordsman(&mut self, id: UnitId, x: u32, y: u32, hp: u32, strength: u32) -> Result<()> {
        self.spawn(swordsman(id, Position::new(x, y), SwordsmanConfig { hp, strength }))
    }

    /// Spawn a [`hunter`].
    ///
    /// # Errors
    ///
    /// See [`spawn`](Self::spawn).
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_hunter(
        &mut self,
        id: UnitId,
        x: u32,
        y: u32,
        hp: u32,
        agility: u32,
        strength: u32,
        range: u32,
    ) -> Result<()> {
        self.spawn(hunter(
            id,
            Position::new(x, y),
            HunterConfig {
                hp,
                agility,
                strength,
                range,
            },
        ))
    }

    /// Add any pre-built unit to the map.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::InvalidPhase`] unless the simulation is `Ready`.
    /// - [`SimulationError::DuplicateUnit`] if the id is taken.
    /// - [`SimulationError::OutOfBounds`] if the cell is off the map.
    /// - [`SimulationError::CellUnavailable`] if the cell is occupied, or
    ///   blocked and the unit blocks ground.
    pub fn spawn(&mut self, entity: Entity) -> Result<()> {
        self.require_ready()?;
        let id = entity.id();
        let position = entity.position();

        if self.world.contains(id) {
            debug!(%id, "spawn rejected: duplicate id");
            return Err(SimulationError::DuplicateUnit(id));
        }
        self.check_bounds(position)?;

        let grid = self.world.grid();
        if grid.unit_at(position).is_some() || (entity.blocks_ground() && grid.blocks_at(position)) {
            debug!(%id, %position, "spawn rejected: cell unavailable");
            return Err(SimulationError::CellUnavailable { unit: id, position });
        }

        self.world.add_entity(entity)
    }

    /// Order `id` to march to `(x, y)`, replacing any previous order.
    ///
    /// Emits `MARCH_STARTED` stamped with the current turn.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::InvalidPhase`] unless the simulation is `Ready`.
    /// - [`SimulationError::UnknownUnit`] if no such unit exists.
    /// - [`SimulationError::OutOfBounds`] if the target is off the map.
    pub fn march(&mut self, id: UnitId, x: u32, y: u32) -> Result<()> {
        self.require_ready()?;
        let Some(from) = self.world.unit_position(id) else {
            debug!(%id, "march rejected: unknown unit");
            return Err(SimulationError::UnknownUnit(id));
        };
        let target = Position::new(x, y);
        self.check_bounds(target)?;

        self.march_targets.insert(id, target);
        self.world.emit(
            self.turn,
            Event::MarchStarted {
                unit_id: id,
                x: from.x,
                y: from.y,
                target_x: x,
                target_y: y,
            },
        );
        Ok(())
    }

    /// Apply one setup command.
    ///
    /// # Errors
    ///
    /// Whatever the matching method returns.
    pub fn execute(&mut self, command: &Command) -> Result<()> {
        match *command {
            Command::CreateMap { width, height } => {
                self.create_map(width, height);
                Ok(())
            }
            Command::SpawnSwordsman {
                unit_id,
                x,
                y,
                hp,
                strength,
            } => self.spawn_swordsman(unit_id, x, y, hp, strength),
            Command::SpawnHunter {
                unit_id,
                x,
                y,
                hp,
                agility,
                strength,
                range,
            } => self.spawn_hunter(unit_id, x, y, hp, agility, strength, range),
            Command::March {
                unit_id,
                target_x,
                target_y,
            } => self.march(unit_id, target_x, target_y),
        }
    }

    /// Apply commands in order, stopping at the first fatal error.
    ///
    /// Rejected requests are collected and returned; they do not stop the
    /// batch.
    ///
    /// # Errors
    ///
    /// The first error for which [`SimulationError::is_fatal`] holds.
    pub fn execute_all<'a, I>(&mut self, commands: I) -> Result<Vec<SimulationError>>
    where
        I: IntoIterator<Item = &'a Command>,
    {
        let mut rejected = Vec::new();
        for command in commands {
            match self.execute(command) {
                Ok(()) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => rejected.push(err),
            }
        }
        Ok(rejected)
    }

    fn require_ready(&self) -> Result<()> {
        if self.phase == Phase::Ready {
            Ok(())
        } else {
            Err(SimulationError::InvalidPhase(self.phase))
        }
    }

    fn check_bounds(&self, position: Position) -> Result<()> {
        let grid = self.world.grid();
        if grid.is_valid_position(position) {
            Ok(())
        } else {
            Err(SimulationError::OutOfBounds {
                position,
                width: grid.width(),
                height: grid.height(),
            })
        }
    }

    // =========================================================================
    // Turn loop
    // =========================================================================

    /// Run with the configured turn cap.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_to_completion(&mut self) -> Result<RunSummary> {
        self.run(self.config.max_turns)
    }

    /// Process turns until at most one unit is alive, a turn passes with no
    /// action, or the counter passes `max_turns`.
    ///
    /// Emits `SIMULATION_STARTED` and `SIMULATION_ENDED` around the loop.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidPhase`] unless the simulation is `Ready`.
    pub fn run(&mut self, max_turns: Turn) -> Result<RunSummary> {
        self.require_ready()?;
        self.phase = Phase::Running;

        let start_turn = self.turn;
        let unit_count = self.world.active_unit_count();
        debug!(unit_count, start_turn, max_turns, "simulation started");
        self.world.emit(
            self.turn,
            Event::SimulationStarted {
                unit_count,
                turn: self.turn,
            },
        );

        let outcome = loop {
            if self.turn > max_turns {
                break Outcome::TurnLimit;
            }
            if self.world.active_unit_count() <= 1 {
                break Outcome::Decided;
            }

            let acted = self.process_turn();
            self.cleanup_march_targets();
            let removed = self.world.flush_pending_removals();
            debug!(turn = self.turn, acted, removed, "turn processed");

            if !acted {
                break Outcome::Stalemate;
            }
            self.turn += 1;
        };

        let summary = RunSummary {
            final_turn: self.turn,
            survivors: self.world.active_unit_count(),
            total_turns: self.turn - start_turn,
            outcome,
        };
        self.world.emit(
            self.turn,
            Event::SimulationEnded {
                final_turn: summary.final_turn,
                survivors: summary.survivors,
                total_turns: summary.total_turns,
            },
        );
        debug!(?summary, "simulation ended");

        self.phase = Phase::Ended;
        Ok(summary)
    }

    fn process_turn(&mut self) -> bool {
        let turn = self.turn;
        let order = self.world.turn_order().to_vec();
        let mut acted = false;

        for id in order {
            if !self.world.entity(id).is_some_and(Entity::is_alive) {
                continue;
            }

            let mut marched = false;
            if let Some(&target) = self.march_targets.get(&id) {
                marched = self.world.move_entity_towards(id, target, turn);
                acted |= marched;

                if let Some(position) = self.world.unit_position(id).filter(|p| *p == target) {
                    self.world.emit(
                        turn,
                        Event::MarchEnded {
                            unit_id: id,
                            x: position.x,
                            y: position.y,
                        },
                    );
                    self.march_targets.remove(&id);
                    acted = true;
                }
            }

            if !marched {
                acted |= self.world.run_ai(id, turn);
            }
        }

        acted
    }

    fn cleanup_march_targets(&mut self) {
        let world = &self.world;
        self.march_targets
            .retain(|id, _| world.entity(*id).is_some_and(Entity::is_alive));
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current turn counter. Starts at 1.
    #[must_use]
    pub const fn turn(&self) -> Turn {
        self.turn
    }

    /// Number of living units.
    #[must_use]
    pub fn active_unit_count(&self) -> usize {
        self.world.active_unit_count()
    }

    /// Returns true if the unit exists and is alive.
    #[must_use]
    pub fn is_unit_active(&self, id: UnitId) -> bool {
        self.world.entity(id).is_some_and(Entity::is_alive)
    }

    /// Position of a registered unit.
    #[must_use]
    pub fn unit_position(&self, id: UnitId) -> Option<Position> {
        self.world.unit_position(id)
    }

    /// Hit points of a registered mortal unit.
    #[must_use]
    pub fn unit_hit_points(&self, id: UnitId) -> Option<u32> {
        self.world.entity(id).and_then(Entity::hit_points)
    }

    /// Outstanding march target of a unit.
    #[must_use]
    pub fn march_target(&self, id: UnitId) -> Option<Position> {
        self.march_targets.get(&id).copied()
    }

    /// Read access to the world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Every event recorded since the last [`take_events`](Self::take_events).
    #[must_use]
    pub fn events(&self) -> &[LoggedEvent] {
        self.world.events()
    }

    /// Drain the event journal.
    pub fn take_events(&mut self) -> Vec<LoggedEvent> {
        self.world.take_events()
    }

    /// Attach a sink for events emitted from now on.
    pub fn add_sink(&mut self, sink: impl EventSink + 'static) {
        self.world.add_sink(Box::new(sink));
    }

    /// Deterministic hash of the whole simulation state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.world.hash_into(&mut hasher);
        self.march_targets.hash(&mut hasher);
        self.turn.hash(&mut hasher);
        self.phase.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(width: u32, height: u32) -> Simulation {
        let mut sim = Simulation::new(SimulationConfig::default().with_seed(7));
        sim.create_map(width, height);
        sim
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn starts_in_setup() {
            let mut sim = Simulation::new(SimulationConfig::default());
            assert_eq!(sim.phase(), Phase::Setup);
            assert_eq!(sim.turn(), 1);
            assert_eq!(
                sim.spawn_swordsman(UnitId::new(1), 0, 0, 5, 1),
                Err(SimulationError::InvalidPhase(Phase::Setup))
            );
            assert_eq!(sim.run(10), Err(SimulationError::InvalidPhase(Phase::Setup)));
        }

        #[test]
        fn run_moves_to_ended_and_create_map_rearms() {
            let mut sim = ready(3, 3);
            sim.run(5).unwrap();
            assert_eq!(sim.phase(), Phase::Ended);
            assert_eq!(
                sim.march(UnitId::new(1), 0, 0),
                Err(SimulationError::InvalidPhase(Phase::Ended))
            );

            sim.create_map(3, 3);
            assert_eq!(sim.phase(), Phase::Ready);
            assert_eq!(sim.turn(), 1);
        }

        #[test]
        fn config_defaults() {
            let config = SimulationConfig::default();
            assert_eq!(config.seed, None);
            assert_eq!(config.max_turns, Turn::from(u32::MAX));

            let parsed: SimulationConfig = serde_json::from_str(r#"{"seed": 9}"#).unwrap();
            assert_eq!(parsed, SimulationConfig::default().with_seed(9));
        }
    }

    mod spawning {
        use super::*;

        #[test]
        fn rejections() {
            let mut sim = ready(4, 4);
            sim.spawn_swordsman(UnitId::new(1), 1, 1, 5, 1).unwrap();

            assert_eq!(
                sim.spawn_swordsman(UnitId::new(1), 2, 2, 5, 1),
                Err(SimulationError::DuplicateUnit(UnitId::new(1)))
            );
            assert_eq!(
                sim.spawn_hunter(UnitId::new(2), 4, 0, 5, 1, 1, 3),
                Err(SimulationError::OutOfBounds {
                    position: Position::new(4, 0),
                    width: 4,
                    height: 4,
                })
            );
            assert_eq!(
                sim.spawn_swordsman(UnitId::new(3), 1, 1, 5, 1),
                Err(SimulationError::CellUnavailable {
                    unit: UnitId::new(3),
                    position: Position::new(1, 1),
                })
            );
            assert_eq!(sim.active_unit_count(), 1);
        }

        #[test]
        fn spawned_units_are_queryable() {
            let mut sim = ready(4, 4);
            sim.spawn_hunter(UnitId::new(5), 3, 2, 9, 2, 1, 3).unwrap();

            assert!(sim.is_unit_active(UnitId::new(5)));
            assert_eq!(sim.unit_position(UnitId::new(5)), Some(Position::new(3, 2)));
            assert_eq!(sim.unit_hit_points(UnitId::new(5)), Some(9));
            assert!(!sim.is_unit_active(UnitId::new(6)));
        }
    }

    mod marching {
        use super::*;

        #[test]
        fn march_validation() {
            let mut sim = ready(4, 4);
            sim.spawn_swordsman(UnitId::new(1), 0, 0, 5, 1).unwrap();

            assert_eq!(
                sim.march(UnitId::new(2), 1, 1),
                Err(SimulationError::UnknownUnit(UnitId::new(2)))
            );
            assert!(matches!(
                sim.march(UnitId::new(1), 9, 9),
                Err(SimulationError::OutOfBounds { .. })
            ));
            assert_eq!(sim.march_target(UnitId::new(1)), None);
        }

        #[test]
        fn march_upserts_and_logs_current_turn() {
            let mut sim = ready(6, 6);
            sim.spawn_swordsman(UnitId::new(1), 0, 0, 5, 1).unwrap();
            sim.march(UnitId::new(1), 3, 3).unwrap();
            sim.march(UnitId::new(1), 5, 0).unwrap();

            assert_eq!(sim.march_target(UnitId::new(1)), Some(Position::new(5, 0)));
            let last = sim.events().last().unwrap();
            assert_eq!(last.turn, 1);
            assert_eq!(last.event.name(), "MARCH_STARTED");
        }
    }

    mod running {
        use super::*;

        #[test]
        fn empty_map_is_decided_immediately() {
            let mut sim = ready(3, 3);
            let summary = sim.run(10).unwrap();
            assert_eq!(
                summary,
                RunSummary {
                    final_turn: 1,
                    survivors: 0,
                    total_turns: 0,
                    outcome: Outcome::Decided,
                }
            );
        }

        #[test]
        fn zero_turn_cap_hits_the_limit() {
            let mut sim = ready(5, 5);
            sim.spawn_swordsman(UnitId::new(1), 0, 0, 5, 1).unwrap();
            sim.spawn_swordsman(UnitId::new(2), 4, 4, 5, 1).unwrap();

            let summary = sim.run(0).unwrap();
            assert_eq!(summary.outcome, Outcome::TurnLimit);
            assert_eq!(summary.total_turns, 0);
            assert_eq!(summary.survivors, 2);
        }

        #[test]
        fn turn_cap_counts_processed_turns() {
            let mut sim = ready(9, 9);
            sim.spawn_swordsman(UnitId::new(1), 0, 0, 5, 1).unwrap();
            sim.spawn_swordsman(UnitId::new(2), 8, 8, 5, 1).unwrap();

            let summary = sim.run(2).unwrap();
            assert_eq!(summary.outcome, Outcome::TurnLimit);
            assert_eq!(summary.final_turn, 3);
            assert_eq!(summary.total_turns, 2);
        }

        #[test]
        fn units_without_ai_stall() {
            let mut sim = ready(5, 5);
            sim.spawn(Entity::new(UnitId::new(1), Position::new(0, 0), "Statue")).unwrap();
            sim.spawn(Entity::new(UnitId::new(2), Position::new(4, 4), "Statue")).unwrap();

            let summary = sim.run(100).unwrap();
            assert_eq!(summary.outcome, Outcome::Stalemate);
            assert_eq!(summary.final_turn, 1);
            assert_eq!(summary.total_turns, 0);
        }
    }
}
