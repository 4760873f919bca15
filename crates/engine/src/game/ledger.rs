//! Reward Ledger - Append-only reward history with a one-way claim flag

use super::Game;
use crate::clock::Clock;
use chrono::{DateTime, Utc};
use rand::Rng;
use spintoearn_core::{CardSource, Error, Result, Reward, RewardDraft, RewardId, RewardKind};
use tracing::{debug, info};

impl<C: Clock, R: Rng> Game<C, R> {
    /// Finalize a draft and append it to the history
    pub fn append_reward(&mut self, draft: RewardDraft) -> Reward {
        let now = self.clock.now();
        self.append_reward_at(draft, now)
    }

    pub(super) fn append_reward_at(&mut self, draft: RewardDraft, now: DateTime<Utc>) -> Reward {
        let reward = Reward::from_draft(draft, self.fresh_reward_id(), now);
        self.state.rewards.push(reward.clone());
        debug!("Reward {} appended: {}", reward.id, reward.name);

        if reward.kind == RewardKind::ScratchCard {
            let card = self.push_card(CardSource::Won);
            info!("Won scratch card {}", card.id);
        }

        reward
    }

    /// Mark a reward as claimed. Claiming twice is a no-op.
    pub fn claim_reward(&mut self, id: &str) -> Result<Reward> {
        let reward = self
            .state
            .rewards
            .iter_mut()
            .find(|r| r.id.as_str() == id)
            .ok_or_else(|| Error::RewardNotFound(id.to_string()))?;

        if !reward.claimed {
            reward.claimed = true;
            info!("Reward {} claimed ({})", reward.id, reward.name);
        }
        Ok(reward.clone())
    }

    /// Claim every outstanding reward, returning how many flipped
    pub fn claim_all(&mut self) -> usize {
        let mut claimed = 0;
        for reward in self.state.rewards.iter_mut().filter(|r| !r.claimed) {
            reward.claimed = true;
            claimed += 1;
        }
        if claimed > 0 {
            info!("Claimed {} reward(s)", claimed);
        }
        claimed
    }

    fn fresh_reward_id(&self) -> RewardId {
        loop {
            let id = RewardId::generate();
            if self.state.find_reward(id.as_str()).is_none() {
                return id;
            }
        }
    }
}
