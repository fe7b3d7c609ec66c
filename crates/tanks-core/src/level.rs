//! A validated level, ready to be applied to a `GameState`.
//!
//! Produced by the level loader. Applying a `Level` cannot fail, which is
//! what makes level loading atomic with respect to the tick loop.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::components::Unit;
use crate::grid::TileGrid;
use crate::types::{UVec2, UnitId};

/// Sprite sheets used by each render layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerImages {
    pub ground: PathBuf,
    pub walls: PathBuf,
    /// Shared by tanks and towers.
    pub units: PathBuf,
    /// Bullets and explosions.
    pub explosions: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Grid dimensions in cells.
    pub world_size: UVec2,
    /// Pixel size of one cell, identical across all layers.
    pub cell_size: UVec2,
    pub ground: TileGrid,
    pub walls: TileGrid,
    /// Tanks first, then towers, each in row-major scan order.
    pub units: Vec<Unit>,
    /// The player's tank: the first unit of the tanks layer.
    pub player: UnitId,
    pub images: LayerImages,
}
