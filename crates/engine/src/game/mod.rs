//! The game aggregate
//!
//! [`Game`] owns the [`GameState`] together with the configuration, the clock
//! and the random source. Operations are split by concern:
//!
//! - `scheduler`: spin eligibility, streaks, performing a spin
//! - `scratch`: free/paid card creation and one-shot reveal
//! - `ledger`: appending and claiming rewards
//!
//! Every operation runs to completion synchronously; callers persist the
//! snapshot afterwards.

mod ledger;
mod scheduler;
mod scratch;

pub use scheduler::{format_countdown, next_streak};

use crate::clock::{Clock, SystemClock};
use crate::generator::RewardEngine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spintoearn_core::{GameConfig, GameState, GameStats, Result};
use tracing::info;

pub struct Game<C: Clock = SystemClock, R: Rng = StdRng> {
    state: GameState,
    config: GameConfig,
    engine: RewardEngine,
    clock: C,
    rng: R,
}

impl Game<SystemClock, StdRng> {
    /// Game driven by the host clock and an entropy-seeded generator
    pub fn with_system(state: GameState, config: GameConfig) -> Result<Self> {
        Self::new(state, config, SystemClock, StdRng::from_entropy())
    }
}

impl<C: Clock, R: Rng> Game<C, R> {
    pub fn new(state: GameState, config: GameConfig, clock: C, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: RewardEngine::new(&config),
            state,
            config,
            clock,
            rng,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Swap in a new configuration (admin screen)
    pub fn set_config(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        self.engine = RewardEngine::new(&config);
        self.config = config;
        info!("Game configuration updated");
        Ok(())
    }

    /// Wipe all progress back to first-load defaults
    pub fn reset(&mut self) {
        self.state = GameState::default();
        info!("Game state reset");
    }

    /// Dashboard summary at the current instant
    pub fn stats(&self) -> GameStats {
        GameStats::collect(
            &self.state,
            self.config.free_cards_per_week,
            self.can_spin(),
            self.time_until_next_spin().num_seconds(),
        )
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{DateTime, TimeZone, Utc};

    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    /// Fresh game on a manual UTC clock with a pinned seed
    pub fn game(config: GameConfig) -> (Game<ManualClock, StdRng>, ManualClock) {
        let clock = ManualClock::utc(start());
        let game = Game::new(
            GameState::default(),
            config,
            clock.clone(),
            StdRng::seed_from_u64(1234),
        )
        .unwrap();
        (game, clock)
    }
}
