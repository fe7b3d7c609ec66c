//! Level validation errors.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A level file that could not be loaded, and why.
#[derive(Debug, Error)]
#[error("error in {}: {defect}", .path.display())]
pub struct LevelError {
    /// File that was being loaded.
    pub path: PathBuf,
    #[source]
    pub defect: LevelDefect,
}

impl LevelError {
    pub fn new(path: &Path, defect: LevelDefect) -> Self {
        Self {
            path: path.to_path_buf(),
            defect,
        }
    }
}

/// Everything that can be wrong with a level file.
#[derive(Debug, Error)]
pub enum LevelDefect {
    #[error("cannot read file: {0}")]
    Io(#[from] io::Error),

    #[error("malformed map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid orientation {0:?}, only orthogonal maps are supported")]
    InvalidOrientation(String),

    #[error("{expected} layers are expected, found {found}")]
    LayerCount { expected: usize, found: usize },

    #[error("layer {layer:?} is not a tile layer")]
    InvalidLayerType { layer: String },

    #[error("layer {layer:?} has {found} tiles, expected {expected}")]
    TileCount {
        layer: String,
        expected: usize,
        found: usize,
    },

    #[error("no tilesets")]
    NoTilesets,

    #[error("no tileset contains gid {gid} used by layer {layer:?}")]
    NoMatchingTileset { layer: String, gid: u32 },

    #[error("cannot resolve tileset {file:?}: {reason}")]
    UnresolvableTileset { file: String, reason: String },

    #[error("tileset {tileset:?} has an invalid columns count")]
    InvalidColumns { tileset: String },

    #[error("tileset {tileset:?} has no image")]
    MissingImage { tileset: String },

    #[error("tileset {tileset:?} embeds its image, only external images are supported")]
    EmbeddedImage { tileset: String },

    #[error("layer {layer:?} uses invalid tile id {gid}")]
    InvalidTileId { layer: String, gid: u32 },

    #[error("tile sizes must be the same in all layers (layer {layer:?})")]
    TileSizeMismatch { layer: String },

    #[error("tanks and towers tilesets must be the same")]
    UnitTilesetMismatch,

    #[error("the tanks layer has no player tank")]
    NoPlayerTank,
}
