//! Level files for the tank battle simulation.
//!
//! Levels are Tiled maps saved as JSON with exactly five tile layers:
//! ground, walls, tanks, towers and explosions. This crate decodes and
//! validates them into `tanks_core::level::Level`, writes maps back out, and
//! generates synthetic arenas.

pub use tanks_core as core;

pub mod arena;
pub mod error;
pub mod loader;
pub mod tiled;

pub use arena::{generate_arena, ArenaSpec};
pub use error::{LevelDefect, LevelError};
pub use loader::{decode_map, load_level, parse_level};
pub use tiled::{write_map, TiledMap};
