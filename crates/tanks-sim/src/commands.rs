//! Command execution: the only code that applies game rules to `GameState`.
//!
//! Every command is validated against the current state before it mutates
//! anything. Breaking a rule (moving into a wall, firing during cooldown)
//! makes the command a no-op; referencing something that does not exist is
//! a `SimError`.

use tanks_core::commands::Command;
use tanks_core::components::retain_alive;
use tanks_core::constants::*;
use tanks_core::enums::Status;
use tanks_core::state::GameState;
use tanks_core::types::{BulletId, DVec2, IVec2, UnitId};
use tracing::{debug, trace};

use crate::error::SimError;

/// Apply one command to the state.
pub fn execute(state: &mut GameState, command: &Command) -> Result<(), SimError> {
    match *command {
        Command::Move { unit, vector } => move_unit(state, unit, vector),
        Command::Target { unit, target } => set_target(state, unit, target),
        Command::Shoot { unit } => shoot(state, unit),
        Command::MoveBullet { bullet } => move_bullet(state, bullet),
        Command::DeleteDestroyed => {
            retain_alive(&mut state.bullets);
            Ok(())
        }
    }
}

fn move_unit(state: &mut GameState, id: UnitId, vector: IVec2) -> Result<(), SimError> {
    let unit = state.unit_mut(id).ok_or(SimError::UnknownUnit(id))?;
    if !unit.is_alive() {
        return Ok(());
    }

    // Facing changes even if the move turns out to be blocked.
    if vector.x < 0 {
        unit.item.orientation = ORIENTATION_LEFT;
    } else if vector.x > 0 {
        unit.item.orientation = ORIENTATION_RIGHT;
    }
    if vector.y < 0 {
        unit.item.orientation = ORIENTATION_UP;
    } else if vector.y > 0 {
        unit.item.orientation = ORIENTATION_DOWN;
    }

    let candidate = unit.position() + vector.as_dvec2();
    if !state.is_inside(candidate) {
        trace!(%id, ?candidate, "move rejected: outside world");
        return Ok(());
    }
    if state.is_wall(candidate) {
        trace!(%id, ?candidate, "move rejected: wall");
        return Ok(());
    }
    if let Some(other) = state.find_unit(candidate) {
        trace!(%id, %other, ?candidate, "move rejected: cell occupied");
        return Ok(());
    }

    if let Some(unit) = state.unit_mut(id) {
        unit.item.position = candidate;
    }
    Ok(())
}

fn set_target(state: &mut GameState, id: UnitId, target: DVec2) -> Result<(), SimError> {
    let unit = state.unit_mut(id).ok_or(SimError::UnknownUnit(id))?;
    unit.weapon_target = target;
    Ok(())
}

fn shoot(state: &mut GameState, id: UnitId) -> Result<(), SimError> {
    let epoch = state.epoch;
    let delay = state.tuning.bullet_delay;
    let unit = state.unit_mut(id).ok_or(SimError::UnknownUnit(id))?;
    if !unit.is_alive() {
        return Ok(());
    }
    if let Some(last) = unit.last_bullet_epoch {
        if epoch.saturating_sub(last) < delay {
            trace!(%id, epoch, last, "shot rejected: reloading");
            return Ok(());
        }
    }

    unit.last_bullet_epoch = Some(epoch);
    let bullet = state.spawn_bullet(id).ok_or(SimError::UnknownUnit(id))?;
    trace!(%id, %bullet, epoch, "bullet fired");
    Ok(())
}

/// True once `position` has reached or passed `end` on both axes, judged
/// along `direction`.
fn has_arrived(direction: DVec2, position: DVec2, end: DVec2) -> bool {
    let reached = |dir: f64, pos: f64, end: f64| {
        if dir >= 0.0 {
            pos >= end
        } else {
            pos <= end
        }
    };
    reached(direction.x, position.x, end.x) && reached(direction.y, position.y, end.y)
}

fn move_bullet(state: &mut GameState, id: BulletId) -> Result<(), SimError> {
    let bullet = *state.bullet(id).ok_or(SimError::UnknownBullet(id))?;
    if !bullet.is_alive() {
        return Ok(());
    }

    let direction = bullet.direction();
    let next = bullet.position() + state.tuning.bullet_speed * direction;

    let spent = !state.is_inside(next)
        || has_arrived(direction, next, bullet.end_position)
        || bullet.start_position.distance(next) >= state.tuning.bullet_range;
    if spent {
        destroy_bullet(state, id);
        return Ok(());
    }

    let hit = state
        .find_live_unit(next + DVec2::splat(HIT_SAMPLE_OFFSET))
        .filter(|&unit| unit != bullet.shooter);
    if let Some(victim) = hit {
        destroy_bullet(state, id);
        if let Some(unit) = state.unit_mut(victim) {
            unit.item.status = Status::Destroyed;
        }
        debug!(unit = %victim, bullet = %id, shooter = %bullet.shooter, epoch = state.epoch, "unit destroyed");
        state.notify_unit_destroyed(victim);
        return Ok(());
    }

    if let Some(bullet) = state.bullet_mut(id) {
        bullet.item.position = next;
    }
    Ok(())
}

fn destroy_bullet(state: &mut GameState, id: BulletId) {
    if let Some(bullet) = state.bullet_mut(id) {
        bullet.item.status = Status::Destroyed;
    }
}
