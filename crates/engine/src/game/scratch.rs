//! Scratch Card Ledger - Card creation under the weekly free quota and the
//! one-shot reveal

use super::Game;
use crate::clock::Clock;
use rand::Rng;
use spintoearn_core::{CardId, CardSource, Error, Result, Reward, ScratchCard};
use tracing::{info, warn};

impl<C: Clock, R: Rng> Game<C, R> {
    /// Take a free card (`paid == false`) or add a bought one
    ///
    /// Free cards count against `free_cards_per_week`; paid cards never do.
    pub fn add_scratch_card(&mut self, paid: bool) -> Result<ScratchCard> {
        let source = if paid { CardSource::Paid } else { CardSource::Free };

        if source == CardSource::Free && self.state.free_cards_this_week >= self.config.free_cards_per_week {
            warn!(
                "Free card refused: {}/{} used this week",
                self.state.free_cards_this_week, self.config.free_cards_per_week
            );
            return Err(Error::WeeklyLimitReached {
                quota: self.config.free_cards_per_week,
            });
        }

        let card = self.push_card(source);
        info!("Scratch card {} added ({:?})", card.id, source);
        Ok(card)
    }

    pub(super) fn push_card(&mut self, source: CardSource) -> ScratchCard {
        let mut card = ScratchCard::new(source);
        while self.state.find_card(card.id.as_str()).is_some() {
            card.id = CardId::generate();
        }
        self.state.scratch_cards.push(card.clone());
        if source == CardSource::Free {
            self.state.free_cards_this_week += 1;
        }
        card
    }

    /// Scratch a card: draw its reward, attach it, and append it to the ledger
    pub fn reveal_scratch_card(&mut self, id: &str) -> Result<Reward> {
        let index = self
            .state
            .scratch_cards
            .iter()
            .position(|c| c.id.as_str() == id)
            .ok_or_else(|| Error::CardNotFound(id.to_string()))?;

        if self.state.scratch_cards[index].revealed {
            warn!("Card {} already revealed", id);
            return Err(Error::AlreadyRevealed(id.to_string()));
        }

        let now = self.clock.now();
        let draft = self.engine.scratch(&mut self.rng);
        // Scratch draws are SOL/USDT only, so appending never cascades
        let reward = self.append_reward_at(draft, now);

        let card = &mut self.state.scratch_cards[index];
        card.revealed = true;
        card.reward = Some(reward.clone());

        info!("Card {} revealed: {}", id, reward.name);
        Ok(reward)
    }

    /// Weekly reset of the free-card counter
    pub fn reset_free_cards(&mut self) {
        self.state.free_cards_this_week = 0;
        info!("Weekly free card counter reset");
    }

    pub fn free_cards_remaining(&self) -> u32 {
        self.config
            .free_cards_per_week
            .saturating_sub(self.state.free_cards_this_week)
    }

    pub fn unrevealed_cards(&self) -> Vec<&ScratchCard> {
        self.state.unrevealed_cards().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::game;
    use super::*;
    use spintoearn_core::{GameConfig, RewardKind};

    #[test]
    fn test_free_quota() {
        let (mut game, _clock) = game(GameConfig::default());
        for used in 1..=3 {
            let card = game.add_scratch_card(false).unwrap();
            assert!(!card.revealed);
            assert_eq!(game.state().free_cards_this_week, used);
        }
        let err = game.add_scratch_card(false).unwrap_err();
        assert_eq!(err, Error::WeeklyLimitReached { quota: 3 });
        assert_eq!(game.state().scratch_cards.len(), 3);
        assert_eq!(game.free_cards_remaining(), 0);
    }

    #[test]
    fn test_paid_cards_ignore_quota() {
        let (mut game, _clock) = game(GameConfig::default());
        for _ in 0..3 {
            game.add_scratch_card(false).unwrap();
        }
        for _ in 0..5 {
            game.add_scratch_card(true).unwrap();
        }
        assert_eq!(game.state().free_cards_this_week, 3);
        assert_eq!(game.state().scratch_cards.len(), 8);
    }

    #[test]
    fn test_configurable_quota() {
        let config = GameConfig {
            free_cards_per_week: 1,
            ..GameConfig::default()
        };
        let (mut game, _clock) = game(config);
        game.add_scratch_card(false).unwrap();
        assert!(matches!(
            game.add_scratch_card(false),
            Err(Error::WeeklyLimitReached { quota: 1 })
        ));
    }

    #[test]
    fn test_reset_free_cards() {
        let (mut game, _clock) = game(GameConfig::default());
        for _ in 0..3 {
            game.add_scratch_card(false).unwrap();
        }
        game.reset_free_cards();
        assert_eq!(game.free_cards_remaining(), 3);
        game.add_scratch_card(false).unwrap();
        assert_eq!(game.state().scratch_cards.len(), 4);
    }

    #[test]
    fn test_reveal_once() {
        let (mut game, _clock) = game(GameConfig::default());
        let card = game.add_scratch_card(false).unwrap();

        let reward = game.reveal_scratch_card(card.id.as_str()).unwrap();
        assert!(matches!(reward.kind, RewardKind::Sol | RewardKind::Usdt));
        assert!(reward.amount.is_some());
        assert_eq!(reward.description, "You scratched a card and won!");

        let state = game.state();
        let stored = state.find_card(card.id.as_str()).unwrap();
        assert!(stored.revealed);
        assert_eq!(stored.reward.as_ref(), Some(&reward));
        assert_eq!(state.rewards.last(), Some(&reward));

        let err = game.reveal_scratch_card(card.id.as_str()).unwrap_err();
        assert_eq!(err, Error::AlreadyRevealed(card.id.to_string()));
        assert_eq!(game.state().rewards.len(), 1);
    }

    #[test]
    fn test_reveal_unknown_card() {
        let (mut game, _clock) = game(GameConfig::default());
        assert_eq!(
            game.reveal_scratch_card("nope").unwrap_err(),
            Error::CardNotFound("nope".to_string())
        );
    }

    #[test]
    fn test_unrevealed_listing() {
        let (mut game, _clock) = game(GameConfig::default());
        let a = game.add_scratch_card(true).unwrap();
        let b = game.add_scratch_card(true).unwrap();
        game.reveal_scratch_card(a.id.as_str()).unwrap();
        let pending: Vec<&str> = game.unrevealed_cards().into_iter().map(|c| c.id.as_str()).collect();
        assert_eq!(pending, vec![b.id.as_str()]);
        assert!(game.state().validate().is_ok());
    }
}
