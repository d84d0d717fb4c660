//! The world: grid, unit registry, randomness and event journal.
//!
//! [`World`] is the single owner of mutable simulation state. Strategies
//! receive `&mut World` together with the acting unit's [`UnitId`] and make
//! every change through the methods here, which keep the grid and the unit
//! registry in sync and emit one event per state change.
//!
//! # Deferred removal
//!
//! A unit that dies mid-turn stays registered (dead) until
//! [`World::flush_pending_removals`] runs between turns. Snapshots of the turn
//! order taken at the start of a turn therefore never dangle.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use lattice::{hash_grid_into, Position, SpatialGrid};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::capability::{AttackKind, AttackStrategy};
use crate::entity::{Entity, UnitId};
use crate::error::{Result, SimulationError};
use crate::event::{Event, EventLog, EventSink, LoggedEvent};
use crate::Turn;

/// Turn stamped on events emitted while setting up a map.
pub const SETUP_TURN: Turn = 1;

/// Grid, units and bookkeeping for one battle.
pub struct World {
    grid: SpatialGrid<UnitId>,
    entities: BTreeMap<UnitId, Entity>,
    turn_order: Vec<UnitId>,
    pending_removal: BTreeSet<UnitId>,
    rng: ChaCha8Rng,
    journal: EventLog,
    sinks: Vec<Box<dyn EventSink>>,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("grid", &self.grid)
            .field("entities", &self.entities.len())
            .field("turn_order", &self.turn_order)
            .field("pending_removal", &self.pending_removal)
            .field("journal", &self.journal.len())
            .field("sinks", &format!("[{} sinks]", self.sinks.len()))
            .finish_non_exhaustive()
    }
}

impl World {
    /// An empty 0x0 world drawing randomness from `rng`.
    ///
    /// Nothing is emitted until [`reset`](Self::reset) creates a map.
    #[must_use]
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self {
            grid: SpatialGrid::default(),
            entities: BTreeMap::new(),
            turn_order: Vec::new(),
            pending_removal: BTreeSet::new(),
            rng,
            journal: EventLog::new(),
            sinks: Vec::new(),
        }
    }

    /// Replace the map with an empty `width` x `height` one.
    ///
    /// All units are dropped. The random source, the sinks and the journal
    /// carry over. Emits `MAP_CREATED`.
    pub fn reset(&mut self, width: u32, height: u32) {
        debug!(width, height, "creating map");
        self.grid = SpatialGrid::new(width, height);
        self.entities.clear();
        self.turn_order.clear();
        self.pending_removal.clear();
        self.emit(SETUP_TURN, Event::MapCreated { width, height });
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Register a unit and place it on the grid. Emits `UNIT_SPAWNED`.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::DuplicateUnit`] if the id is already registered.
    /// - [`SimulationError::PlacementConflict`] if the grid refuses the cell.
    ///   Callers are expected to have checked the cell beforehand.
    pub fn add_entity(&mut self, entity: Entity) -> Result<()> {
        let id = entity.id();
        let position = entity.position();
        if self.entities.contains_key(&id) {
            return Err(SimulationError::DuplicateUnit(id));
        }

        self.grid
            .place_unit(id, position, entity.blocks_ground())
            .map_err(|source| SimulationError::PlacementConflict { unit: id, source })?;

        let unit_type = entity.type_name().to_owned();
        self.entities.insert(id, entity);
        self.turn_order.push(id);

        self.emit(
            SETUP_TURN,
            Event::UnitSpawned {
                unit_id: id,
                unit_type,
                x: position.x,
                y: position.y,
            },
        );
        Ok(())
    }

    /// Remove a unit from the grid, the registry, the turn order and the
    /// pending-removal set.
    pub fn remove_entity(&mut self, id: UnitId) -> Option<Entity> {
        self.grid.remove_unit(id);
        self.turn_order.retain(|other| *other != id);
        self.pending_removal.remove(&id);
        self.entities.remove(&id)
    }

    /// Remove every unit scheduled by a lethal hit. Returns how many went.
    pub fn flush_pending_removals(&mut self) -> usize {
        let doomed = std::mem::take(&mut self.pending_removal);
        for &id in &doomed {
            self.remove_entity(id);
        }
        doomed.len()
    }

    /// Units waiting for [`flush_pending_removals`](Self::flush_pending_removals).
    pub fn pending_removals(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.pending_removal.iter().copied()
    }

    /// Look up a unit, dead or alive.
    #[must_use]
    pub fn entity(&self, id: UnitId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable lookup.
    pub fn entity_mut(&mut self, id: UnitId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns true if the id is registered.
    #[must_use]
    pub fn contains(&self, id: UnitId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Every registered unit in id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Units in the order they act, i.e. spawn order.
    #[must_use]
    pub fn turn_order(&self) -> &[UnitId] {
        &self.turn_order
    }

    /// Number of living registered units.
    #[must_use]
    pub fn active_unit_count(&self) -> usize {
        self.entities.values().filter(|e| e.is_alive()).count()
    }

    /// Current position of a registered unit.
    #[must_use]
    pub fn unit_position(&self, id: UnitId) -> Option<Position> {
        self.entities.get(&id).map(Entity::position)
    }

    /// The underlying grid.
    #[must_use]
    pub const fn grid(&self) -> &SpatialGrid<UnitId> {
        &self.grid
    }

    /// The shared random source.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Move `unit` to `destination`. Emits `UNIT_MOVED` on success.
    ///
    /// Fails when the unit is unknown or dead, is already there, the cell is
    /// off the map, or (unless `ignore_blocking`) another unit blocks it.
    pub fn try_move(
        &mut self,
        unit: UnitId,
        destination: Position,
        turn: Turn,
        ignore_blocking: bool,
    ) -> bool {
        let Some(entity) = self.entities.get(&unit) else {
            return false;
        };
        if !entity.is_alive() || entity.position() == destination {
            return false;
        }
        if !self.grid.is_valid_position(destination) {
            return false;
        }
        if !ignore_blocking
            && self.grid.blocks_at(destination)
            && !self.grid.is_position_occupied_by(destination, unit)
        {
            return false;
        }

        let blocks_ground = entity.blocks_ground();
        if let Err(err) = self.grid.move_unit(unit, destination) {
            trace!(%unit, %destination, %err, "move refused by grid");
            return false;
        }
        // The grid clears the old cell only; blocking at the new one is ours.
        if blocks_ground {
            self.grid.set_position_blocked(destination, true);
        }
        if let Some(entity) = self.entities.get_mut(&unit) {
            entity.set_position(destination);
        }

        trace!(turn, %unit, %destination, "unit moved");
        self.emit(
            turn,
            Event::UnitMoved {
                unit_id: unit,
                x: destination.x,
                y: destination.y,
            },
        );
        true
    }

    /// Deal `damage` from `attacker` to `target`.
    ///
    /// Ignored when damage is not positive, the target has no Health, or it is
    /// already dead. Otherwise emits `UNIT_ATTACKED`, and `UNIT_DIED` plus a
    /// removal schedule if the hit was lethal.
    pub fn apply_damage(&mut self, attacker: UnitId, target: UnitId, damage: i64, turn: Turn) {
        if damage <= 0 {
            return;
        }
        let Some(health) = self.entities.get_mut(&target).and_then(Entity::health_mut) else {
            return;
        };
        if !health.is_alive() {
            return;
        }

        health.apply_damage(damage);
        let target_hp = health.hit_points();
        let died = !health.is_alive();

        trace!(turn, %attacker, %target, damage, target_hp, "unit attacked");
        self.emit(
            turn,
            Event::UnitAttacked {
                attacker_unit_id: attacker,
                target_unit_id: target,
                damage: u32::try_from(damage).unwrap_or(u32::MAX),
                target_hp,
            },
        );

        if died {
            self.emit(turn, Event::UnitDied { unit_id: target });
            self.pending_removal.insert(target);
        }
    }

    /// Step `unit` toward `target` with its Movement capability.
    ///
    /// Units without Movement never move.
    pub fn move_entity_towards(&mut self, unit: UnitId, target: Position, turn: Turn) -> bool {
        let Some(movement) = self.entities.get(&unit).and_then(|e| e.movement().cloned()) else {
            return false;
        };
        movement.advance(unit, self, target, turn)
    }

    /// Strike `target` with one of `attacker`'s attacks.
    ///
    /// Attacks of the `preferred` kind are tried first. If none lands, every
    /// attack is tried in declaration order. The first hit wins.
    pub fn execute_attack(
        &mut self,
        attacker: UnitId,
        target: UnitId,
        turn: Turn,
        preferred: Option<AttackKind>,
    ) -> bool {
        if let Some(kind) = preferred {
            if self.execute_attack_of_kind(attacker, target, turn, kind) {
                return true;
            }
        }
        self.attacks_of(attacker)
            .iter()
            .any(|attack| attack.attack(attacker, target, self, turn))
    }

    /// Strike `target` using only attacks of `kind`, in declaration order.
    pub fn execute_attack_of_kind(
        &mut self,
        attacker: UnitId,
        target: UnitId,
        turn: Turn,
        kind: AttackKind,
    ) -> bool {
        self.attacks_of(attacker)
            .iter()
            .filter(|attack| attack.kind() == kind)
            .any(|attack| attack.attack(attacker, target, self, turn))
    }

    /// Let `unit`'s AI take its turn. Units without AI never act.
    pub fn run_ai(&mut self, unit: UnitId, turn: Turn) -> bool {
        let Some(ai) = self.entities.get(&unit).and_then(|e| e.ai().cloned()) else {
            return false;
        };
        ai.update(unit, self, turn)
    }

    fn attacks_of(&self, unit: UnitId) -> Vec<Arc<dyn AttackStrategy>> {
        self.entities
            .get(&unit)
            .map(|e| e.attacks().to_vec())
            .unwrap_or_default()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Record an event in the journal and hand it to every sink.
    pub fn emit(&mut self, turn: Turn, event: Event) {
        let entry = LoggedEvent { turn, event };
        for sink in &mut self.sinks {
            sink.record(&entry);
        }
        self.journal.push(entry);
    }

    /// Attach a sink. It sees events emitted from now on.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Every event recorded since the last [`take_events`](Self::take_events).
    #[must_use]
    pub fn events(&self) -> &[LoggedEvent] {
        self.journal.entries()
    }

    /// Drain the journal.
    pub fn take_events(&mut self) -> Vec<LoggedEvent> {
        self.journal.drain()
    }

    // =========================================================================
    // Hashing
    // =========================================================================

    /// Feed grid, unit and removal state into `hasher`.
    pub fn hash_into<H: Hasher>(&self, hasher: &mut H) {
        hash_grid_into(&self.grid, hasher);
        for (id, entity) in &self.entities {
            id.hash(hasher);
            entity.position().hash(hasher);
            entity.type_name().hash(hasher);
            entity.hit_points().hash(hasher);
        }
        self.turn_order.hash(hasher);
        self.pending_removal.hash(hasher);
    }

    /// Deterministic hash of the world state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_into(&mut hasher);
        hasher.finish()
    }
}
