//! Scratch card model

use crate::models::Reward;
use crate::types::CardId;
use serde::{Deserialize, Serialize};

/// How a card entered the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSource {
    /// Weekly free card, counted against the quota
    #[default]
    Free,
    /// Bought through the wallet
    Paid,
    /// Materialized by a "scratchcard" spin reward
    Won,
}

/// A deferred reward token
///
/// The reward is drawn at reveal time, never at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScratchCard {
    pub id: CardId,
    pub revealed: bool,
    pub reward: Option<Reward>,
    #[serde(default)]
    pub source: CardSource,
}

impl ScratchCard {
    /// A fresh unrevealed card with no reward
    pub fn new(source: CardSource) -> Self {
        Self {
            id: CardId::generate(),
            revealed: false,
            reward: None,
            source,
        }
    }

    /// `reward` is set iff `revealed`
    pub fn is_consistent(&self) -> bool {
        self.revealed == self.reward.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_is_unrevealed() {
        let card = ScratchCard::new(CardSource::Paid);
        assert!(!card.revealed);
        assert!(card.reward.is_none());
        assert!(card.is_consistent());
    }

    #[test]
    fn test_source_defaults_when_missing() {
        let card: ScratchCard =
            serde_json::from_str(r#"{"id":"c1","revealed":false,"reward":null}"#).unwrap();
        assert_eq!(card.source, CardSource::Free);
        assert_eq!(card.id.as_str(), "c1");
    }
}
