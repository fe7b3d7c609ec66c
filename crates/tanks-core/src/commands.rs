//! Commands that mutate the game state.
//!
//! Commands are built during the input phase of a tick, queued, and applied
//! in FIFO order during the execution phase. They carry handles, never
//! references, so a queue can be built before any of it runs.

use serde::{Deserialize, Serialize};

use crate::types::{BulletId, DVec2, IVec2, UnitId};

/// All possible mutations of the game state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Step a unit by `vector` (each axis in -1..=1) and turn it to face
    /// the move direction.
    Move { unit: UnitId, vector: IVec2 },
    /// Aim a unit's weapon at `target`.
    Target { unit: UnitId, target: DVec2 },
    /// Fire a bullet toward the unit's weapon target, cooldown permitting.
    Shoot { unit: UnitId },
    /// Advance a bullet one tick along its path and resolve hits.
    MoveBullet { bullet: BulletId },
    /// Remove destroyed bullets from the bullet list.
    DeleteDestroyed,
}
