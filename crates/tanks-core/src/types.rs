//! Fundamental geometric and identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use glam::{DVec2, IVec2, UVec2};

/// Handle to a unit: its index in `GameState::units`.
///
/// Units are never removed while a level is active, so a handle stays valid
/// until the next level load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub usize);

/// Handle to a bullet. Ids increase monotonically in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BulletId(pub u64);

/// Position of a sub-image in a sprite sheet, in tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef {
    pub column: u32,
    pub row: u32,
}

impl TileRef {
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Tile for a local tile id in a sheet with `columns` tiles per row.
    pub fn from_local_id(local_id: u32, columns: u32) -> Self {
        Self {
            column: local_id % columns,
            row: local_id / columns,
        }
    }
}

impl From<(u32, u32)> for TileRef {
    fn from((column, row): (u32, u32)) -> Self {
        Self::new(column, row)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit #{}", self.0)
    }
}

impl fmt::Display for BulletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bullet #{}", self.0)
    }
}

/// Integer cell containing `position`.
///
/// Coordinates are truncated toward zero, not floored or rounded: collision
/// cells depend on this exact behaviour.
pub fn cell_of(position: DVec2) -> (i64, i64) {
    (position.x as i64, position.y as i64)
}
