//! Simulation constants and tuning defaults.

// --- Projectiles ---

/// Bullet travel per tick, in grid units.
pub const DEFAULT_BULLET_SPEED: f64 = 0.1;

/// Maximum distance a bullet may travel from its spawn point, in grid units.
pub const DEFAULT_BULLET_RANGE: f64 = 4.0;

/// Minimum number of ticks between two shots of the same unit.
pub const DEFAULT_BULLET_DELAY: u64 = 5;

/// Offset added to a bullet position before sampling the unit grid,
/// so that hits are tested against cell centres.
pub const HIT_SAMPLE_OFFSET: f64 = 0.5;

// --- Orientation (degrees, as consumed by sprite rotation) ---

pub const ORIENTATION_UP: i32 = 0;
pub const ORIENTATION_DOWN: i32 = 180;
pub const ORIENTATION_LEFT: i32 = 90;
pub const ORIENTATION_RIGHT: i32 = -90;

// --- Sprite sheet coordinates ---

/// Bullet sprite in the explosions sheet.
pub const BULLET_TILE: (u32, u32) = (2, 1);

/// Turret (weapon) sprite in the units sheet.
pub const WEAPON_TILE: (u32, u32) = (0, 6);

// --- Default arena (before any level is loaded) ---

pub const DEFAULT_WORLD_WIDTH: u32 = 16;
pub const DEFAULT_WORLD_HEIGHT: u32 = 10;
pub const DEFAULT_GROUND_TILE: (u32, u32) = (5, 1);
pub const DEFAULT_PLAYER_TILE: (u32, u32) = (1, 0);
pub const DEFAULT_PLAYER_POSITION: (f64, f64) = (8.0, 9.0);

/// Pixel size of one grid cell when no level overrides it.
pub const DEFAULT_CELL_SIZE: u32 = 64;

// --- Level files ---

/// Number of layers a level map must contain.
/// Order: ground, walls, tanks, towers, explosions.
pub const LEVEL_LAYER_COUNT: usize = 5;
