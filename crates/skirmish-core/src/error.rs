//! Error types for the simulation.

use lattice::{GridError, Position};
use thiserror::Error;

use crate::entity::UnitId;
use crate::simulation::Phase;

/// Result type alias using [`SimulationError`].
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Top-level error type for setup commands and world mutations.
///
/// Two classes share this enum:
/// - **Rejected requests** (everything except `PlacementConflict`): the caller
///   asked for something invalid and may carry on.
/// - **Invariant violations** (`PlacementConflict`): a caller bypassed the
///   checks that should have made the request impossible. See
///   [`SimulationError::is_fatal`].
///
/// Failures inside a running turn (blocked moves, out-of-range attacks) are
/// not errors; they are `false` returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The command is not accepted in the current lifecycle phase.
    #[error("operation not allowed while the simulation is {0}")]
    InvalidPhase(Phase),

    /// A unit with this id is already registered.
    #[error("unit {0} already exists")]
    DuplicateUnit(UnitId),

    /// No unit with this id is registered.
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),

    /// A spawn or march target lies outside the map.
    #[error("position {position} is outside the {width}x{height} map")]
    OutOfBounds {
        /// Requested position.
        position: Position,
        /// Map width.
        width: u32,
        /// Map height.
        height: u32,
    },

    /// The spawn cell is occupied or blocked.
    #[error("cannot spawn unit {unit} at {position}: cell is occupied or blocked")]
    CellUnavailable {
        /// Unit that was being spawned.
        unit: UnitId,
        /// Requested position.
        position: Position,
    },

    /// The grid refused a placement that upstream checks should have allowed.
    #[error("failed to place unit {unit} on the map: {source}")]
    PlacementConflict {
        /// Unit that was being placed.
        unit: UnitId,
        /// Underlying grid rejection.
        #[source]
        source: GridError,
    },
}

impl SimulationError {
    /// Returns true for invariant violations that signal a broken caller
    /// contract rather than an invalid request.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::PlacementConflict { .. })
    }
}
