//! Events emitted by the simulation for presentation-side feedback.
//!
//! `GameState` holds a list of observers and notifies them synchronously,
//! in registration order. Observers only ever see copies of the data, so
//! they cannot mutate the state they are observing.

use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::types::{DVec2, TileRef, UnitId};

/// A unit was hit by a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitDestroyed {
    pub unit: UnitId,
    /// Last known position, where an explosion should be shown.
    pub position: DVec2,
    pub tile: TileRef,
    /// Epoch of the tick in which the unit was destroyed.
    pub epoch: u64,
}

/// Domain events, as a single stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    UnitDestroyed(UnitDestroyed),
}

/// Listener for game state events.
///
/// Every method has an empty default body, so observers implement only the
/// events they care about.
pub trait GameStateObserver {
    fn unit_destroyed(&mut self, _event: &UnitDestroyed) {}
}

/// Forward events into a channel, e.g. to a render thread.
/// A disconnected receiver is ignored.
impl GameStateObserver for mpsc::Sender<GameEvent> {
    fn unit_destroyed(&mut self, event: &UnitDestroyed) {
        let _ = self.send(GameEvent::UnitDestroyed(*event));
    }
}
