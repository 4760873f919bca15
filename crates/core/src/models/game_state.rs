//! The persisted aggregate root

use crate::errors::{Error, Result};
use crate::models::{Reward, RewardKind, ScratchCard};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything the game remembers between sessions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub last_spin_time: Option<DateTime<Utc>>,
    pub streak_days: u32,
    pub total_spins: u64,
    /// Append-only, insertion order
    pub rewards: Vec<Reward>,
    /// Append-only, insertion order
    pub scratch_cards: Vec<ScratchCard>,
    pub free_cards_this_week: u32,
}

impl GameState {
    pub fn has_unclaimed_replay(&self) -> bool {
        self.rewards.iter().any(Reward::is_unclaimed_replay)
    }

    pub fn find_reward(&self, id: &str) -> Option<&Reward> {
        self.rewards.iter().find(|r| r.id.as_str() == id)
    }

    pub fn find_card(&self, id: &str) -> Option<&ScratchCard> {
        self.scratch_cards.iter().find(|c| c.id.as_str() == id)
    }

    pub fn unrevealed_cards(&self) -> impl Iterator<Item = &ScratchCard> {
        self.scratch_cards.iter().filter(|c| !c.revealed)
    }

    pub fn unclaimed_rewards(&self) -> impl Iterator<Item = &Reward> {
        self.rewards.iter().filter(|r| !r.claimed)
    }

    /// Rewards sorted by timestamp, newest first. Equal timestamps keep the
    /// later insertion first.
    pub fn rewards_newest_first(&self, kind: Option<RewardKind>) -> Vec<&Reward> {
        let mut rewards: Vec<&Reward> = self
            .rewards
            .iter()
            .rev()
            .filter(|r| kind.map_or(true, |k| r.kind == k))
            .collect();
        rewards.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        rewards
    }

    /// Group rewards by calendar date in the given offset, newest day first
    pub fn rewards_by_day(
        &self,
        kind: Option<RewardKind>,
        offset: FixedOffset,
    ) -> Vec<(NaiveDate, Vec<&Reward>)> {
        let mut days: Vec<(NaiveDate, Vec<&Reward>)> = Vec::new();
        for reward in self.rewards_newest_first(kind) {
            let date = reward.timestamp.with_timezone(&offset).date_naive();
            match days.last_mut() {
                Some((day, group)) if *day == date => group.push(reward),
                _ => days.push((date, vec![reward])),
            }
        }
        days
    }

    /// Sum of SOL and USDT payouts won so far
    pub fn total_amount(&self, kind: RewardKind) -> f64 {
        self.rewards
            .iter()
            .filter(|r| r.kind == kind)
            .filter_map(|r| r.amount)
            .sum()
    }

    /// Check the invariants a restored snapshot must hold
    pub fn validate(&self) -> Result<()> {
        let mut reward_ids = HashSet::new();
        for reward in &self.rewards {
            if !reward_ids.insert(reward.id.as_str()) {
                return Err(Error::InvalidData(format!("duplicate reward id {}", reward.id)));
            }
            if !reward.amount_matches_kind() {
                return Err(Error::InvalidData(format!(
                    "reward {} of type {} has an invalid amount",
                    reward.id, reward.kind
                )));
            }
        }

        let mut card_ids = HashSet::new();
        for card in &self.scratch_cards {
            if !card_ids.insert(card.id.as_str()) {
                return Err(Error::InvalidData(format!("duplicate card id {}", card.id)));
            }
            if !card.is_consistent() {
                return Err(Error::InvalidData(format!(
                    "card {} has revealed={} but reward present={}",
                    card.id,
                    card.revealed,
                    card.reward.is_some()
                )));
            }
            if let Some(prize) = &card.reward {
                let scratched = matches!(prize.kind, RewardKind::Sol | RewardKind::Usdt);
                if !scratched || !prize.amount_matches_kind() {
                    return Err(Error::InvalidData(format!(
                        "card {} holds an invalid {} reward",
                        card.id, prize.kind
                    )));
                }
                match self.find_reward(prize.id.as_str()) {
                    Some(logged) if logged.kind == prize.kind && logged.amount == prize.amount => {}
                    _ => {
                        return Err(Error::InvalidData(format!(
                            "card {} reward {} is missing from the history",
                            card.id, prize.id
                        )))
                    }
                }
            }
        }

        Ok(())
    }
}
