//! Synthetic arena generator.
//!
//! Builds a walled rectangular level with one player tank and any number of
//! towers, using the standard sprite sheets. Useful for demos and for
//! exercising the simulation without hand-made maps.

use serde::{Deserialize, Serialize};
use tanks_core::constants::DEFAULT_CELL_SIZE;
use tanks_core::types::UVec2;

use crate::tiled::{TiledLayer, TiledMap, Tileset, TilesetEntry, ORTHOGONAL};

/// Sheets are 8 tiles wide, 8 tall (units and terrain) or 5 tall with
/// 28 columns (explosions).
const SHEET_COLUMNS: u32 = 8;
const SHEET_ROWS: u32 = 8;
const EXPLOSION_COLUMNS: u32 = 28;
const EXPLOSION_ROWS: u32 = 5;

/// Local tile ids within their sheets.
const GRASS_TILE: u32 = 13;
const WALL_TILE: u32 = 9;
const TANK_TILE: u32 = 1;
const TOWER_TILE: u32 = 8;

/// Layout of a generated arena. Positions are in cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSpec {
    pub width: u32,
    pub height: u32,
    /// Pixel size of a tile.
    pub cell_size: u32,
    pub player: UVec2,
    pub towers: Vec<UVec2>,
    /// Surround the arena with a ring of walls.
    pub border: bool,
}

impl Default for ArenaSpec {
    /// 16×10 walled field, player at the bottom, three towers at the top.
    fn default() -> Self {
        Self {
            width: 16,
            height: 10,
            cell_size: DEFAULT_CELL_SIZE,
            player: UVec2::new(8, 8),
            towers: vec![UVec2::new(3, 2), UVec2::new(8, 1), UVec2::new(12, 3)],
            border: true,
        }
    }
}

/// Generate the Tiled map for `spec`. Cells outside the arena are ignored.
pub fn generate_arena(spec: &ArenaSpec) -> TiledMap {
    let (width, height) = (spec.width, spec.height);
    let cell_count = width as usize * height as usize;
    let index = |p: UVec2| -> Option<usize> {
        (p.x < width && p.y < height).then(|| p.y as usize * width as usize + p.x as usize)
    };

    let sheet_tiles = SHEET_COLUMNS * SHEET_ROWS;
    let ground_gid = 1;
    let walls_gid = ground_gid + sheet_tiles;
    let units_gid = walls_gid + sheet_tiles;
    let explosions_gid = units_gid + sheet_tiles;

    let ground = vec![ground_gid + GRASS_TILE; cell_count];

    let mut walls = vec![0; cell_count];
    if spec.border {
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    walls[y as usize * width as usize + x as usize] = walls_gid + WALL_TILE;
                }
            }
        }
    }

    let mut tanks = vec![0; cell_count];
    if let Some(i) = index(spec.player) {
        tanks[i] = units_gid + TANK_TILE;
        walls[i] = 0;
    }

    let mut towers = vec![0; cell_count];
    for &tower in &spec.towers {
        if let Some(i) = index(tower) {
            towers[i] = units_gid + TOWER_TILE;
            walls[i] = 0;
        }
    }

    let size = spec.cell_size;
    TiledMap {
        kind: "map".to_string(),
        orientation: ORTHOGONAL.to_string(),
        width,
        height,
        tilewidth: size,
        tileheight: size,
        infinite: false,
        layers: vec![
            TiledLayer::tiles("ground", width, height, ground),
            TiledLayer::tiles("walls", width, height, walls),
            TiledLayer::tiles("tanks", width, height, tanks),
            TiledLayer::tiles("towers", width, height, towers),
            TiledLayer::tiles("explosions", width, height, vec![0; cell_count]),
        ],
        tilesets: vec![
            TilesetEntry::Inline {
                firstgid: ground_gid,
                tileset: Tileset::sheet("ground", "ground.png", size, SHEET_COLUMNS, SHEET_ROWS),
            },
            TilesetEntry::Inline {
                firstgid: walls_gid,
                tileset: Tileset::sheet("walls", "walls.png", size, SHEET_COLUMNS, SHEET_ROWS),
            },
            TilesetEntry::Inline {
                firstgid: units_gid,
                tileset: Tileset::sheet("units", "units.png", size, SHEET_COLUMNS, SHEET_ROWS),
            },
            TilesetEntry::Inline {
                firstgid: explosions_gid,
                tileset: Tileset::sheet(
                    "explosions",
                    "explosions.png",
                    size,
                    EXPLOSION_COLUMNS,
                    EXPLOSION_ROWS,
                ),
            },
        ],
    }
}
