//! Scripted stand-in for a human player.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tanks_core::state::GameState;
use tanks_core::types::{DVec2, IVec2, UVec2, UnitId};
use tanks_sim::PlayerInput;

/// Chance per tick that the bot steps somewhere.
const MOVE_CHANCE: f64 = 0.3;
/// Chance per tick that the bot pulls the trigger while it has a target.
const FIRE_CHANCE: f64 = 0.5;

/// Wanders at random and shoots at the nearest live enemy.
/// Same seed, same inputs.
pub struct Bot {
    rng: ChaCha8Rng,
}

impl Bot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn next_input(&mut self, state: &GameState, player: UnitId, cell_size: UVec2) -> PlayerInput {
        let Some(me) = state.unit(player) else {
            return PlayerInput::default();
        };
        let here = me.position();

        let target = state
            .live_units()
            .filter(|&(id, _)| id != player)
            .map(|(_, unit)| unit.position())
            .min_by(|a, b| a.distance_squared(here).total_cmp(&b.distance_squared(here)));

        let move_vector = if self.rng.gen_bool(MOVE_CHANCE) {
            IVec2::new(self.rng.gen_range(-1..=1), self.rng.gen_range(-1..=1))
        } else {
            IVec2::ZERO
        };

        // Pointer over the centre of the target's cell.
        let pointer = target
            .map(|t| (t + DVec2::splat(0.5)) * cell_size.as_dvec2())
            .unwrap_or_default();
        let fire = target.is_some() && self.rng.gen_bool(FIRE_CHANCE);

        PlayerInput {
            move_vector,
            pointer,
            fire,
        }
    }
}
