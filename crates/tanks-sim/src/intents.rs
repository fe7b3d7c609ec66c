//! Intent phase of a tick: turning player input and turret AI into commands.
//!
//! Nothing here mutates the state. Commands are appended to the queue in the
//! order the execution phase must apply them.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tanks_core::commands::Command;
use tanks_core::state::GameState;
use tanks_core::types::{DVec2, IVec2, UVec2, UnitId};

use crate::error::SimError;

/// What the player asked for during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Step direction, each axis in -1..=1. Zero means stay.
    pub move_vector: IVec2,
    /// Pointer position in pixels, relative to the top-left of the map.
    pub pointer: DVec2,
    /// Fire was triggered this tick.
    pub fire: bool,
}

/// Map a pointer in pixels to the grid coordinate the weapon should aim at.
///
/// Unit positions are top-left corners, so the half-cell shift makes the
/// pointer aim at cell centres.
pub fn pointer_to_grid(pointer: DVec2, cell_size: UVec2) -> DVec2 {
    pointer / cell_size.as_dvec2() - DVec2::splat(0.5)
}

/// Queue every command for one tick of an active game.
pub fn queue_tick_commands(
    state: &GameState,
    player: UnitId,
    input: &PlayerInput,
    cell_size: UVec2,
    queue: &mut VecDeque<Command>,
) -> Result<(), SimError> {
    queue_player_commands(player, input, cell_size, queue);
    queue_turret_commands(state, player, queue)?;
    queue_bullet_commands(state, queue);
    queue.push_back(Command::DeleteDestroyed);
    Ok(())
}

fn queue_player_commands(
    player: UnitId,
    input: &PlayerInput,
    cell_size: UVec2,
    queue: &mut VecDeque<Command>,
) {
    if input.move_vector != IVec2::ZERO {
        queue.push_back(Command::Move {
            unit: player,
            vector: input.move_vector,
        });
    }
    queue.push_back(Command::Target {
        unit: player,
        target: pointer_to_grid(input.pointer, cell_size),
    });
    if input.fire {
        queue.push_back(Command::Shoot { unit: player });
    }
}

/// Every other unit aims at the player and fires once it is in range.
fn queue_turret_commands(
    state: &GameState,
    player: UnitId,
    queue: &mut VecDeque<Command>,
) -> Result<(), SimError> {
    let target = state
        .unit(player)
        .ok_or(SimError::UnknownUnit(player))?
        .position();
    let range = state.tuning.bullet_range;

    for (i, unit) in state.units.iter().enumerate() {
        let id = UnitId(i);
        if id == player {
            continue;
        }
        queue.push_back(Command::Target { unit: id, target });
        if unit.position().distance(target) <= range {
            queue.push_back(Command::Shoot { unit: id });
        }
    }
    Ok(())
}

fn queue_bullet_commands(state: &GameState, queue: &mut VecDeque<Command>) {
    queue.extend(
        state
            .bullets
            .iter()
            .filter(|bullet| bullet.is_alive())
            .map(|bullet| Command::MoveBullet { bullet: bullet.id }),
    );
}
