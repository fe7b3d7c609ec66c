//! GameState: the single mutable simulation root, with its queries and
//! observer registry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::{Bullet, Unit};
use crate::constants::*;
use crate::events::{GameStateObserver, UnitDestroyed};
use crate::grid::TileGrid;
use crate::level::Level;
use crate::types::{cell_of, BulletId, DVec2, TileRef, UVec2, UnitId};

/// Projectile tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Grid units travelled per tick.
    pub bullet_speed: f64,
    /// Maximum travel distance from the spawn point. Also the distance at
    /// which turrets open fire.
    pub bullet_range: f64,
    /// Minimum ticks between two shots of the same unit.
    pub bullet_delay: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bullet_speed: DEFAULT_BULLET_SPEED,
            bullet_range: DEFAULT_BULLET_RANGE,
            bullet_delay: DEFAULT_BULLET_DELAY,
        }
    }
}

/// Complete simulation state.
///
/// Mutated only by commands during the execution phase of a tick, and by
/// `apply_level` between ticks.
pub struct GameState {
    /// Tick counter. Increases by exactly one per completed tick.
    pub epoch: u64,
    /// Grid dimensions in cells. Changed only by `apply_level`.
    pub world_size: UVec2,
    pub ground: TileGrid,
    /// Any non-empty cell blocks unit movement.
    pub walls: TileGrid,
    /// Units in insertion order. Destroyed units are kept.
    pub units: Vec<Unit>,
    /// Bullets in spawn order, hence sorted by id.
    pub bullets: Vec<Bullet>,
    pub tuning: Tuning,
    next_bullet_id: u64,
    observers: Vec<Box<dyn GameStateObserver>>,
}

impl Default for GameState {
    /// The built-in arena: an open 16×10 field with a single player tank.
    fn default() -> Self {
        let (width, height) = (DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT);
        let (px, py) = DEFAULT_PLAYER_POSITION;
        Self {
            epoch: 0,
            world_size: UVec2::new(width, height),
            ground: TileGrid::filled(width, height, Some(TileRef::from(DEFAULT_GROUND_TILE))),
            walls: TileGrid::empty(width, height),
            units: vec![Unit::new(DVec2::new(px, py), TileRef::from(DEFAULT_PLAYER_TILE))],
            bullets: Vec::new(),
            tuning: Tuning::default(),
            next_bullet_id: 0,
            observers: Vec::new(),
        }
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("epoch", &self.epoch)
            .field("world_size", &self.world_size)
            .field("units", &self.units.len())
            .field("bullets", &self.bullets.len())
            .field("tuning", &self.tuning)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// Default arena with custom tuning.
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            tuning,
            ..Self::default()
        }
    }

    pub fn world_width(&self) -> u32 {
        self.world_size.x
    }

    pub fn world_height(&self) -> u32 {
        self.world_size.y
    }

    /// True if `position` lies in `[0, width) × [0, height)`.
    pub fn is_inside(&self, position: DVec2) -> bool {
        position.x >= 0.0
            && position.x < self.world_width() as f64
            && position.y >= 0.0
            && position.y < self.world_height() as f64
    }

    /// True if the cell containing `position` holds a wall.
    pub fn is_wall(&self, position: DVec2) -> bool {
        let (x, y) = cell_of(position);
        self.walls.get(x, y).is_some()
    }

    /// First unit, in list order, whose cell is the cell of `position`.
    /// Destroyed units are included.
    pub fn find_unit(&self, position: DVec2) -> Option<UnitId> {
        let cell = cell_of(position);
        self.units
            .iter()
            .position(|unit| cell_of(unit.position()) == cell)
            .map(UnitId)
    }

    /// Like `find_unit`, but only if that unit is alive.
    pub fn find_live_unit(&self, position: DVec2) -> Option<UnitId> {
        self.find_unit(position)
            .filter(|&id| self.units[id.0].is_alive())
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0)
    }

    /// Live units with their handles, in list order.
    pub fn live_units(&self) -> impl Iterator<Item = (UnitId, &Unit)> + '_ {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.is_alive())
            .map(|(i, unit)| (UnitId(i), unit))
    }

    fn bullet_index(&self, id: BulletId) -> Option<usize> {
        self.bullets.binary_search_by_key(&id, |b| b.id).ok()
    }

    pub fn bullet(&self, id: BulletId) -> Option<&Bullet> {
        let i = self.bullet_index(id)?;
        Some(&self.bullets[i])
    }

    pub fn bullet_mut(&mut self, id: BulletId) -> Option<&mut Bullet> {
        let i = self.bullet_index(id)?;
        Some(&mut self.bullets[i])
    }

    /// Append a bullet fired by `shooter` toward its current weapon target.
    /// Returns `None` if the shooter does not exist.
    pub fn spawn_bullet(&mut self, shooter: UnitId) -> Option<BulletId> {
        let unit = self.units.get(shooter.0)?;
        let id = BulletId(self.next_bullet_id);
        self.next_bullet_id += 1;
        self.bullets.push(Bullet::spawn(id, shooter, unit));
        Some(id)
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn add_observer(&mut self, observer: Box<dyn GameStateObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Tell every observer that `id` was destroyed.
    pub fn notify_unit_destroyed(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(id.0) else {
            return;
        };
        let event = UnitDestroyed {
            unit: id,
            position: unit.position(),
            tile: unit.item.tile,
            epoch: self.epoch,
        };
        for observer in &mut self.observers {
            observer.unit_destroyed(&event);
        }
    }

    /// Replace terrain, units and bullets with those of `level`.
    ///
    /// Epoch, tuning, bullet ids and observers carry over.
    pub fn apply_level(&mut self, level: Level) {
        self.world_size = level.world_size;
        self.ground = level.ground;
        self.walls = level.walls;
        self.units = level.units;
        self.bullets.clear();
    }
}
