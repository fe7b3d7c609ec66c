//! Runtime faults raised while executing a tick.

use tanks_core::types::{BulletId, UnitId};
use thiserror::Error;

/// A command referenced something that does not exist.
///
/// Breaking a game rule is never an error; these only arise from commands
/// built against a different state than the one they run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("{0} does not exist")]
    UnknownUnit(UnitId),
    #[error("{0} does not exist")]
    UnknownBullet(BulletId),
}
