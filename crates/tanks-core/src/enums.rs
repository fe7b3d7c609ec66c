//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Lifecycle status shared by units and bullets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Alive,
    Destroyed,
}

/// How a finished game ended, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every non-player unit was destroyed.
    Victory,
    /// The player's unit was destroyed.
    Defeat,
}

/// Top-level state of the turn loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level loaded, or the last session was abandoned after a fault.
    #[default]
    NoGame,
    /// A level is being played.
    Active,
    /// The game ended; the state is frozen until another level is loaded.
    Over(Outcome),
}

impl GamePhase {
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Over(_))
    }
}
