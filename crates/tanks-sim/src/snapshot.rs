//! Snapshot building: copies the visible parts of `GameState` into a
//! serializable view for presentation.

use tanks_core::constants::WEAPON_TILE;
use tanks_core::enums::GamePhase;
use tanks_core::snapshot::{BulletView, GameStateSnapshot, UnitView};
use tanks_core::state::GameState;
use tanks_core::types::{TileRef, UnitId};

/// Build the snapshot of `state`. Destroyed bullets are left out; destroyed
/// units are kept so their wrecks can still be drawn.
pub fn build_snapshot(
    state: &GameState,
    phase: GamePhase,
    player: Option<UnitId>,
) -> GameStateSnapshot {
    let units = state
        .units
        .iter()
        .enumerate()
        .map(|(i, unit)| UnitView {
            id: UnitId(i),
            position: unit.position(),
            status: unit.item.status,
            tile: unit.item.tile,
            orientation: unit.item.orientation,
            weapon_tile: TileRef::from(WEAPON_TILE),
            weapon_angle: unit.weapon_angle(),
            weapon_target: unit.weapon_target,
        })
        .collect();

    let bullets = state
        .bullets
        .iter()
        .filter(|bullet| bullet.is_alive())
        .map(|bullet| BulletView {
            id: bullet.id,
            position: bullet.position(),
            tile: bullet.item.tile,
            shooter: bullet.shooter,
        })
        .collect();

    GameStateSnapshot {
        epoch: state.epoch,
        phase,
        world_size: state.world_size,
        ground: state.ground.clone(),
        walls: state.walls.clone(),
        player,
        units,
        bullets,
    }
}
