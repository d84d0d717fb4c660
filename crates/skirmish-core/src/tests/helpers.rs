//! Test helper functions for building worlds, units and simulations.

use std::io;
use std::sync::{Arc, Mutex};

use lattice::Position;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::capability::{BasicHealth, TerrainMovement};
use crate::entity::{Entity, UnitId};
use crate::event::LoggedEvent;
use crate::simulation::{Simulation, SimulationConfig};
use crate::world::World;

// =============================================================================
// Worlds and units
// =============================================================================

/// A seeded random source.
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A world with a fixed seed and a fresh `width` x `height` map.
pub fn seeded_world(width: u32, height: u32) -> World {
    let mut world = World::new(rng(7));
    world.reset(width, height);
    world
}

/// A mortal, mobile unit with no attacks and no AI.
pub fn dummy(id: UnitId, position: Position, hp: u32) -> Entity {
    Entity::new(id, position, "Dummy")
        .with_health(BasicHealth::new(hp))
        .with_movement(TerrainMovement::new(1))
}

/// An immortal, immobile unit with no behaviour.
pub fn totem(id: UnitId, position: Position) -> Entity {
    Entity::new(id, position, "Totem")
}

// =============================================================================
// Simulations
// =============================================================================

/// A seeded simulation with a map already created.
pub fn ready_sim(seed: u64, width: u32, height: u32) -> Simulation {
    let mut sim = Simulation::new(SimulationConfig::default().with_seed(seed));
    sim.create_map(width, height);
    sim
}

/// Two swordsmen on a 5x5 map, side by side.
pub fn setup_duel(sim: &mut Simulation) {
    sim.spawn_swordsman(UnitId::new(1), 0, 0, 10, 5).unwrap();
    sim.spawn_swordsman(UnitId::new(2), 1, 0, 10, 5).unwrap();
}

/// A mixed crowd spread over a 12x12 map.
pub fn setup_melee(sim: &mut Simulation) {
    for (id, x, y) in [(1, 0, 0), (2, 11, 0), (3, 0, 11), (4, 6, 6)] {
        sim.spawn_swordsman(UnitId::new(id), x, y, 12, 3).unwrap();
    }
    for (id, x, y) in [(5, 11, 11), (6, 3, 8), (7, 8, 2)] {
        sim.spawn_hunter(UnitId::new(id), x, y, 8, 2, 1, 4).unwrap();
    }
    sim.march(UnitId::new(1), 5, 5).unwrap();
}

/// Event names in order.
pub fn event_names(events: &[LoggedEvent]) -> Vec<&'static str> {
    events.iter().map(|e| e.event.name()).collect()
}

/// Rendered event lines in order.
pub fn event_lines(events: &[LoggedEvent]) -> Vec<String> {
    events.iter().map(ToString::to_string).collect()
}

// =============================================================================
// Capturing output
// =============================================================================

/// A cloneable in-memory writer for checking sink output.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
