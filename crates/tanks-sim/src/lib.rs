//! Simulation engine for the tank battle game.
//!
//! Owns the `GameState`, turns player input and turret AI into commands each
//! tick, executes them in order, and reports the game phase. Completely
//! headless, so every rule can be tested deterministically.

pub mod commands;
pub mod engine;
pub mod error;
pub mod intents;
pub mod snapshot;

pub use engine::{SimConfig, SimulationEngine};
pub use error::SimError;
pub use intents::PlayerInput;
pub use tanks_core as core;
