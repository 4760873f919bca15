//! Dashboard summary

use crate::models::{GameState, RewardKind};
use serde::Serialize;

/// Aggregated figures shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub total_spins: u64,
    pub streak_days: u32,
    pub rewards_won: usize,
    pub unclaimed_rewards: usize,
    pub total_sol: f64,
    pub total_usdt: f64,
    pub unrevealed_cards: usize,
    pub free_cards_remaining: u32,
    pub can_spin: bool,
    /// Seconds until the next spin (0 when eligible)
    pub next_spin_in_secs: i64,
}

impl GameStats {
    pub fn collect(
        state: &GameState,
        free_cards_per_week: u32,
        can_spin: bool,
        next_spin_in_secs: i64,
    ) -> Self {
        Self {
            total_spins: state.total_spins,
            streak_days: state.streak_days,
            rewards_won: state.rewards.len(),
            unclaimed_rewards: state.unclaimed_rewards().count(),
            total_sol: state.total_amount(RewardKind::Sol),
            total_usdt: state.total_amount(RewardKind::Usdt),
            unrevealed_cards: state.unrevealed_cards().count(),
            free_cards_remaining: free_cards_per_week.saturating_sub(state.free_cards_this_week),
            can_spin,
            next_spin_in_secs,
        }
    }
}
