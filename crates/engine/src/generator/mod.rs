//! Reward Engine - Weighted random reward selection
//!
//! One uniform draw in `[0, 1)` is matched against consecutive bands laid out
//! in declaration order (sol, usdt, nft, scratchcard, replay). Numeric
//! variants then draw their payout from the configured interval.

use rand::Rng;
use spintoearn_core::{round_to_decimals, GameConfig, PayoutRange, PayoutTable, RewardDraft, RewardKind, RewardWeights};
use tracing::debug;

/// Stateless reward generator built from a [`GameConfig`]
#[derive(Debug, Clone)]
pub struct RewardEngine {
    weights: RewardWeights,
    spin_payouts: PayoutTable,
    scratch_payouts: PayoutTable,
}

impl RewardEngine {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            weights: config.weights,
            spin_payouts: config.spin_payouts,
            scratch_payouts: config.scratch_payouts,
        }
    }

    /// Map a roll in `[0, 1)` to the band that contains it
    pub fn pick_kind(&self, roll: f64) -> RewardKind {
        let mut cumulative = 0.0;
        for (kind, weight) in self.weights.bands() {
            cumulative += weight;
            if roll < cumulative {
                return kind;
            }
        }
        // Only reachable through float rounding at the top of the interval
        RewardKind::Replay
    }

    /// Draw a spin reward
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> RewardDraft {
        let roll: f64 = rng.gen();
        let kind = self.pick_kind(roll);
        debug!("Spin roll {:.4} -> {}", roll, kind);

        match kind {
            RewardKind::Sol => RewardDraft::sol(draw_payout(&self.spin_payouts.sol, rng)),
            RewardKind::Usdt => RewardDraft::usdt(draw_payout(&self.spin_payouts.usdt, rng)),
            RewardKind::Nft => RewardDraft::nft_booster(),
            RewardKind::ScratchCard => RewardDraft::scratch_card(),
            RewardKind::Replay => RewardDraft::replay(),
        }
    }

    /// Draw the payout behind a scratch card: an even split between a small
    /// SOL and a small USDT amount, independent of the spin table
    pub fn scratch<R: Rng + ?Sized>(&self, rng: &mut R) -> RewardDraft {
        if rng.gen_bool(0.5) {
            RewardDraft::scratched(RewardKind::Sol, draw_payout(&self.scratch_payouts.sol, rng))
        } else {
            RewardDraft::scratched(RewardKind::Usdt, draw_payout(&self.scratch_payouts.usdt, rng))
        }
    }
}

impl Default for RewardEngine {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

fn draw_payout<R: Rng + ?Sized>(range: &PayoutRange, rng: &mut R) -> f64 {
    round_to_decimals(rng.gen_range(range.min..range.max), range.decimals)
}
