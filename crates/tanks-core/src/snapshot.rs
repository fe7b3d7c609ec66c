//! Game state snapshot: the read-only view handed to presentation each tick.

use serde::{Deserialize, Serialize};

use crate::enums::{GamePhase, Status};
use crate::grid::TileGrid;
use crate::types::{BulletId, DVec2, TileRef, UVec2, UnitId};

/// Complete visible state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub epoch: u64,
    pub phase: GamePhase,
    pub world_size: UVec2,
    pub ground: TileGrid,
    pub walls: TileGrid,
    pub player: Option<UnitId>,
    pub units: Vec<UnitView>,
    pub bullets: Vec<BulletView>,
}

/// A unit as drawn: hull sprite plus turret angle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub position: DVec2,
    pub status: Status,
    pub tile: TileRef,
    /// Hull orientation (degrees).
    pub orientation: i32,
    /// Turret sprite, drawn over the hull at `weapon_angle`.
    pub weapon_tile: TileRef,
    /// Turret orientation (degrees), derived from the weapon target.
    pub weapon_angle: f64,
    pub weapon_target: DVec2,
}

/// A live bullet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub id: BulletId,
    pub position: DVec2,
    pub tile: TileRef,
    pub shooter: UnitId,
}
