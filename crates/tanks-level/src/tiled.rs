//! Tiled JSON map format: the subset needed for levels.
//!
//! Only orthogonal, finite maps with CSV (array) layer data are supported.
//! Tilesets are either inline or external (`source`, a `.tsj` file relative
//! to the map).

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Layer `type` value for tile layers.
pub const TILE_LAYER: &str = "tilelayer";

/// The only supported map orientation.
pub const ORTHOGONAL: &str = "orthogonal";

fn default_orientation() -> String {
    ORTHOGONAL.to_string()
}

fn default_map_type() -> String {
    "map".to_string()
}

/// Top-level map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledMap {
    #[serde(rename = "type", default = "default_map_type")]
    pub kind: String,
    #[serde(default = "default_orientation")]
    pub orientation: String,
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub infinite: bool,
    pub layers: Vec<TiledLayer>,
    #[serde(default)]
    pub tilesets: Vec<TilesetEntry>,
}

/// One map layer. Non-tile layers are parsed so they can be reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledLayer {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Global tile ids, row-major. 0 means an empty cell.
    #[serde(default)]
    pub data: Vec<u32>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

impl TiledLayer {
    /// A visible tile layer.
    pub fn tiles(name: &str, width: u32, height: u32, data: Vec<u32>) -> Self {
        Self {
            name: name.to_string(),
            kind: TILE_LAYER.to_string(),
            width,
            height,
            data,
            visible: true,
        }
    }
}

/// A tileset reference inside a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TilesetEntry {
    /// Stored in its own file.
    External { firstgid: u32, source: String },
    /// Stored in the map.
    Inline {
        firstgid: u32,
        #[serde(flatten)]
        tileset: Tileset,
    },
}

impl TilesetEntry {
    pub fn firstgid(&self) -> u32 {
        match self {
            TilesetEntry::External { firstgid, .. } | TilesetEntry::Inline { firstgid, .. } => {
                *firstgid
            }
        }
    }
}

/// Tileset definition: a sprite sheet cut into equally sized tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    #[serde(default)]
    pub name: String,
    pub tilewidth: u32,
    pub tileheight: u32,
    pub tilecount: u32,
    /// Tiles per row in the sprite sheet.
    #[serde(default)]
    pub columns: u32,
    /// Path to the sprite sheet, relative to the file defining the tileset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub imagewidth: u32,
    #[serde(default)]
    pub imageheight: u32,
}

impl Tileset {
    /// A tileset whose sheet is `columns × rows` tiles of `tile_size` pixels.
    /// Sizes saturate at `u32::MAX`.
    pub fn sheet(name: &str, image: &str, tile_size: u32, columns: u32, rows: u32) -> Self {
        Self {
            name: name.to_string(),
            tilewidth: tile_size,
            tileheight: tile_size,
            tilecount: columns.saturating_mul(rows),
            columns,
            image: Some(image.to_string()),
            imagewidth: tile_size.saturating_mul(columns),
            imageheight: tile_size.saturating_mul(rows),
        }
    }
}

/// Serialize a map to pretty-printed Tiled JSON.
pub fn serialize_map(map: &TiledMap) -> serde_json::Result<String> {
    serde_json::to_string_pretty(map)
}

/// Write a map to a Tiled JSON file.
pub fn write_map(map: &TiledMap, path: &Path) -> io::Result<()> {
    let json = serialize_map(map)?;
    std::fs::write(path, json)
}
