//! Setup commands accepted by [`Simulation::execute`](crate::simulation::Simulation::execute).
//!
//! Commands are plain data so a scenario can be stored, sent or replayed.
//! They deserialize from JSON objects tagged by `command`:
//!
//! ```
//! use skirmish_core::command::Command;
//! use skirmish_core::entity::UnitId;
//!
//! let command: Command = serde_json::from_str(
//!     r#"{"command":"MARCH","unitId":3,"targetX":4,"targetY":1}"#,
//! ).unwrap();
//! assert_eq!(
//!     command,
//!     Command::March { unit_id: UnitId::new(3), target_x: 4, target_y: 1 }
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::UnitId;

/// One setup instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Start over on an empty map.
    CreateMap {
        /// Map width.
        width: u32,
        /// Map height.
        height: u32,
    },
    /// Spawn a melee unit.
    #[serde(rename_all = "camelCase", alias = "SPAWN_MELEE")]
    SpawnSwordsman {
        /// New unit's id.
        unit_id: UnitId,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
        /// Starting hit points.
        hp: u32,
        /// Melee damage.
        strength: u32,
    },
    /// Spawn a ranged unit.
    #[serde(rename_all = "camelCase", alias = "SPAWN_RANGED")]
    SpawnHunter {
        /// New unit's id.
        unit_id: UnitId,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
        /// Starting hit points.
        hp: u32,
        /// Ranged damage.
        agility: u32,
        /// Melee damage.
        strength: u32,
        /// Farthest shooting distance.
        range: u32,
    },
    /// Send a unit to a cell.
    #[serde(rename_all = "camelCase")]
    March {
        /// Marching unit.
        unit_id: UnitId,
        /// Destination column.
        target_x: u32,
        /// Destination row.
        target_y: u32,
    },
}
