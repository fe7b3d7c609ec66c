//! Game items: the data shared by units and bullets, and the two item kinds.
//!
//! Items are plain data. Game rules live in the command executor, not here.

use serde::{Deserialize, Serialize};

use crate::constants::BULLET_TILE;
use crate::enums::Status;
use crate::types::{BulletId, DVec2, TileRef, UnitId};

/// Fields common to every item placed on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameItem {
    /// Continuous grid coordinate of the item's top-left corner.
    pub position: DVec2,
    pub status: Status,
    /// Sprite used to draw the item.
    pub tile: TileRef,
    /// Facing angle in degrees.
    pub orientation: i32,
}

impl GameItem {
    pub fn new(position: DVec2, tile: TileRef) -> Self {
        Self {
            position,
            status: Status::Alive,
            tile,
            orientation: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }
}

/// A tank or a tower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub item: GameItem,
    /// Point the weapon is aimed at. May lie outside the world.
    pub weapon_target: DVec2,
    /// Epoch of the last shot; `None` until the unit fires.
    pub last_bullet_epoch: Option<u64>,
}

impl Unit {
    pub fn new(position: DVec2, tile: TileRef) -> Self {
        Self {
            item: GameItem::new(position, tile),
            weapon_target: DVec2::ZERO,
            last_bullet_epoch: None,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.item.position
    }

    pub fn is_alive(&self) -> bool {
        self.item.is_alive()
    }

    /// Weapon angle in degrees, in the same convention as `orientation`
    /// (0 = up, 90 = left, 180 = down).
    pub fn weapon_angle(&self) -> f64 {
        let aim = self.weapon_target - self.item.position;
        (-aim.x).atan2(-aim.y).to_degrees()
    }
}

/// A projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: BulletId,
    pub item: GameItem,
    /// Unit that fired the bullet. Only used to ignore self hits.
    pub shooter: UnitId,
    pub start_position: DVec2,
    /// Aim point captured at spawn time; the bullet is never re-aimed.
    pub end_position: DVec2,
}

impl Bullet {
    /// Spawn a bullet at the shooter's position, heading for its weapon target.
    pub fn spawn(id: BulletId, shooter_id: UnitId, shooter: &Unit) -> Self {
        Self {
            id,
            item: GameItem::new(shooter.position(), TileRef::from(BULLET_TILE)),
            shooter: shooter_id,
            start_position: shooter.position(),
            end_position: shooter.weapon_target,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.item.position
    }

    pub fn is_alive(&self) -> bool {
        self.item.is_alive()
    }

    /// Unit travel direction, derived from the fixed endpoints.
    /// A bullet aimed at its own start point has a zero direction.
    pub fn direction(&self) -> DVec2 {
        (self.end_position - self.start_position).normalize_or_zero()
    }
}

impl AsRef<GameItem> for Unit {
    fn as_ref(&self) -> &GameItem {
        &self.item
    }
}

impl AsRef<GameItem> for Bullet {
    fn as_ref(&self) -> &GameItem {
        &self.item
    }
}

/// Drop destroyed items, keeping the survivors in their original order.
pub fn retain_alive<T: AsRef<GameItem>>(items: &mut Vec<T>) {
    items.retain(|item| item.as_ref().is_alive());
}
