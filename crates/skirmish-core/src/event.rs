//! Structured simulation events and where they go.
//!
//! Every observable state change is reported as an [`Event`] stamped with the
//! turn it happened on ([`LoggedEvent`]). The world keeps every event in its
//! [`EventLog`] journal and forwards each one, in order, to any attached
//! [`EventSink`]s.
//!
//! # Rendering
//!
//! A logged event displays as one line: the turn, the event name, then its
//! fields as `key=value` pairs.
//!
//! ```
//! use skirmish_core::event::{Event, LoggedEvent};
//! use skirmish_core::entity::UnitId;
//!
//! let line = LoggedEvent {
//!     turn: 3,
//!     event: Event::UnitMoved { unit_id: UnitId::new(7), x: 2, y: 4 },
//! };
//! assert_eq!(line.to_string(), "3 UNIT_MOVED unitId=7 x=2 y=4");
//! ```

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

use crate::entity::UnitId;
use crate::Turn;

// =============================================================================
// Events
// =============================================================================

/// Something that happened in the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    /// A fresh map was created.
    MapCreated {
        /// Map width.
        width: u32,
        /// Map height.
        height: u32,
    },
    /// A unit joined the map.
    #[serde(rename_all = "camelCase")]
    UnitSpawned {
        /// New unit.
        unit_id: UnitId,
        /// Archetype label.
        unit_type: String,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// A unit received a march order.
    #[serde(rename_all = "camelCase")]
    MarchStarted {
        /// Marching unit.
        unit_id: UnitId,
        /// Column when the order was given.
        x: u32,
        /// Row when the order was given.
        y: u32,
        /// Destination column.
        target_x: u32,
        /// Destination row.
        target_y: u32,
    },
    /// A unit reached its march destination.
    #[serde(rename_all = "camelCase")]
    MarchEnded {
        /// Marching unit.
        unit_id: UnitId,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// A unit changed cell.
    #[serde(rename_all = "camelCase")]
    UnitMoved {
        /// Moving unit.
        unit_id: UnitId,
        /// New column.
        x: u32,
        /// New row.
        y: u32,
    },
    /// A unit took damage.
    #[serde(rename_all = "camelCase")]
    UnitAttacked {
        /// Striking unit.
        attacker_unit_id: UnitId,
        /// Struck unit.
        target_unit_id: UnitId,
        /// Damage dealt.
        damage: u32,
        /// Target's hit points afterwards.
        target_hp: u32,
    },
    /// A unit's hit points reached zero.
    #[serde(rename_all = "camelCase")]
    UnitDied {
        /// Dead unit.
        unit_id: UnitId,
    },
    /// The turn loop began.
    #[serde(rename_all = "camelCase")]
    SimulationStarted {
        /// Living units at the start.
        unit_count: usize,
        /// First turn to be processed.
        turn: Turn,
    },
    /// The turn loop stopped.
    #[serde(rename_all = "camelCase")]
    SimulationEnded {
        /// Turn counter when the loop stopped.
        final_turn: Turn,
        /// Living units at the end.
        survivors: usize,
        /// Turns fully processed.
        total_turns: Turn,
    },
}

impl Event {
    /// The event's wire name, e.g. `UNIT_MOVED`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MapCreated { .. } => "MAP_CREATED",
            Self::UnitSpawned { .. } => "UNIT_SPAWNED",
            Self::MarchStarted { .. } => "MARCH_STARTED",
            Self::MarchEnded { .. } => "MARCH_ENDED",
            Self::UnitMoved { .. } => "UNIT_MOVED",
            Self::UnitAttacked { .. } => "UNIT_ATTACKED",
            Self::UnitDied { .. } => "UNIT_DIED",
            Self::SimulationStarted { .. } => "SIMULATION_STARTED",
            Self::SimulationEnded { .. } => "SIMULATION_ENDED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        match self {
            Self::MapCreated { width, height } => write!(f, " width={width} height={height}"),
            Self::UnitSpawned {
                unit_id,
                unit_type,
                x,
                y,
            } => write!(f, " unitId={unit_id} unitType={unit_type} x={x} y={y}"),
            Self::MarchStarted {
                unit_id,
                x,
                y,
                target_x,
                target_y,
            } => write!(
                f,
                " unitId={unit_id} x={x} y={y} targetX={target_x} targetY={target_y}"
            ),
            Self::MarchEnded { unit_id, x, y } | Self::UnitMoved { unit_id, x, y } => {
                write!(f, " unitId={unit_id} x={x} y={y}")
            }
            Self::UnitAttacked {
                attacker_unit_id,
                target_unit_id,
                damage,
                target_hp,
            } => write!(
                f,
                " attackerUnitId={attacker_unit_id} targetUnitId={target_unit_id} damage={damage} targetHp={target_hp}"
            ),
            Self::UnitDied { unit_id } => write!(f, " unitId={unit_id}"),
            Self::SimulationStarted { unit_count, turn } => {
                write!(f, " unitCount={unit_count} turn={turn}")
            }
            Self::SimulationEnded {
                final_turn,
                survivors,
                total_turns,
            } => write!(
                f,
                " finalTurn={final_turn} survivors={survivors} totalTurns={total_turns}"
            ),
        }
    }
}

/// An event stamped with its turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Turn the event happened on.
    pub turn: Turn,
    /// What happened.
    #[serde(flatten)]
    pub event: Event,
}

impl fmt::Display for LoggedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.turn, self.event)
    }
}

// =============================================================================
// Journal
// =============================================================================

/// Append-only, in-memory record of every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    entries: Vec<LoggedEvent>,
}

impl EventLog {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event.
    pub fn push(&mut self, entry: LoggedEvent) {
        self.entries.push(entry);
    }

    /// Every recorded event, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[LoggedEvent] {
        &self.entries
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every recorded event.
    pub fn drain(&mut self) -> Vec<LoggedEvent> {
        std::mem::take(&mut self.entries)
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Receives each event synchronously as it is emitted.
pub trait EventSink: Send {
    /// Handle one event.
    fn record(&mut self, entry: &LoggedEvent);
}

/// Forwards every event to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, entry: &LoggedEvent) {
        tracing::info!(turn = entry.turn, event = entry.event.name(), "{}", entry);
    }
}

/// Writes one rendered line per event.
///
/// Write failures never interrupt the simulation; they are counted instead.
#[derive(Debug)]
pub struct WriterSink<W: io::Write> {
    writer: W,
    failures: usize,
}

impl<W: io::Write> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failures: 0,
        }
    }

    /// Number of lines that could not be written.
    #[must_use]
    pub const fn failures(&self) -> usize {
        self.failures
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write + Send> EventSink for WriterSink<W> {
    fn record(&mut self, entry: &LoggedEvent) {
        if writeln!(self.writer, "{entry}").is_err() {
            self.failures += 1;
        }
    }
}
