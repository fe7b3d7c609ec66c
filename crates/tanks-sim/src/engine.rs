//! Simulation engine: the per-tick driver.
//!
//! `SimulationEngine` owns the `GameState`, builds the tick's commands from
//! player input and turret AI, executes them in FIFO order and evaluates the
//! end of the game. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tanks_core::commands::Command;
use tanks_core::constants::DEFAULT_CELL_SIZE;
use tanks_core::enums::{GamePhase, Outcome};
use tanks_core::events::GameStateObserver;
use tanks_core::level::{LayerImages, Level};
use tanks_core::snapshot::GameStateSnapshot;
use tanks_core::state::{GameState, Tuning};
use tanks_core::types::{UVec2, UnitId};
use tanks_level::LevelError;
use tracing::{error, info, warn};

use crate::commands;
use crate::error::SimError;
use crate::intents::{self, PlayerInput};
use crate::snapshot::build_snapshot;

/// Configuration for a new engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tuning: Tuning,
    /// Pixel size of a cell, used for pointer mapping until a level sets it.
    pub cell_size: UVec2,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            cell_size: UVec2::splat(DEFAULT_CELL_SIZE),
        }
    }
}

/// The simulation engine. Owns the game state and the command queue.
pub struct SimulationEngine {
    state: GameState,
    phase: GamePhase,
    player: UnitId,
    cell_size: UVec2,
    images: LayerImages,
    command_queue: VecDeque<Command>,
}

impl SimulationEngine {
    /// Create an engine holding the default arena, with no game running.
    pub fn new(config: SimConfig) -> Self {
        Self {
            state: GameState::with_tuning(config.tuning),
            phase: GamePhase::default(),
            player: UnitId(0),
            cell_size: config.cell_size,
            images: LayerImages::default(),
            command_queue: VecDeque::new(),
        }
    }

    /// Load a level file and start playing it.
    ///
    /// On failure nothing changes: the running game, if any, continues.
    pub fn load_level(&mut self, path: &Path) -> Result<(), LevelError> {
        match tanks_level::load_level(path) {
            Ok(level) => {
                self.start_level(level);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "level rejected, keeping current game");
                Err(err)
            }
        }
    }

    /// Replace the world with `level` and start a new game.
    pub fn start_level(&mut self, level: Level) {
        self.player = level.player;
        self.cell_size = level.cell_size;
        self.images = level.images.clone();
        self.state.apply_level(level);
        self.command_queue.clear();
        self.phase = GamePhase::Active;
        info!(
            width = self.state.world_width(),
            height = self.state.world_height(),
            units = self.state.units.len(),
            epoch = self.state.epoch,
            "game started"
        );
    }

    /// Register a destruction observer. Observers survive level changes.
    pub fn add_observer(&mut self, observer: Box<dyn GameStateObserver>) {
        self.state.add_observer(observer);
    }

    /// Queue an extra command, applied after the next tick's own commands.
    /// Discarded if the game is over by then.
    pub fn queue_command(&mut self, command: Command) {
        self.command_queue.push_back(command);
    }

    /// Advance the simulation by one tick and return the resulting phase.
    ///
    /// Does nothing while no game is active. A fault abandons the game:
    /// the engine returns to `NoGame` and the error is passed on.
    pub fn tick(&mut self, input: &PlayerInput) -> Result<GamePhase, SimError> {
        if self.phase == GamePhase::NoGame {
            return Ok(self.phase);
        }
        if let Err(err) = self.run_tick(input) {
            error!(error = %err, epoch = self.state.epoch, "tick failed, abandoning game");
            self.abandon();
            return Err(err);
        }
        Ok(self.phase)
    }

    /// Drop the running game. The state keeps its last contents.
    pub fn abandon(&mut self) {
        self.phase = GamePhase::NoGame;
        self.command_queue.clear();
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self) -> UnitId {
        self.player
    }

    /// Pixel size of a cell in the current level.
    pub fn cell_size(&self) -> UVec2 {
        self.cell_size
    }

    /// Sprite sheets of the current level.
    pub fn images(&self) -> &LayerImages {
        &self.images
    }

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> GameStateSnapshot {
        let player = (self.phase != GamePhase::NoGame).then_some(self.player);
        build_snapshot(&self.state, self.phase, player)
    }

    fn run_tick(&mut self, input: &PlayerInput) -> Result<(), SimError> {
        if self.phase == GamePhase::Active {
            // Tick commands go ahead of anything queued from outside.
            let mut commands = VecDeque::new();
            intents::queue_tick_commands(
                &self.state,
                self.player,
                input,
                self.cell_size,
                &mut commands,
            )?;
            commands.append(&mut self.command_queue);
            self.command_queue = commands;
        } else {
            self.command_queue.clear();
        }

        self.process_commands()?;
        self.state.epoch += 1;

        if self.phase == GamePhase::Active {
            if let Some(outcome) = self.evaluate_outcome()? {
                info!(?outcome, epoch = self.state.epoch, "game over");
                self.phase = GamePhase::Over(outcome);
            }
        }
        Ok(())
    }

    fn process_commands(&mut self) -> Result<(), SimError> {
        while let Some(command) = self.command_queue.pop_front() {
            commands::execute(&mut self.state, &command)?;
        }
        Ok(())
    }

    fn evaluate_outcome(&self) -> Result<Option<Outcome>, SimError> {
        let player = self
            .state
            .unit(self.player)
            .ok_or(SimError::UnknownUnit(self.player))?;
        if !player.is_alive() {
            return Ok(Some(Outcome::Defeat));
        }
        let enemies_alive = self.state.live_units().any(|(id, _)| id != self.player);
        Ok((!enemies_alive).then_some(Outcome::Victory))
    }
}
