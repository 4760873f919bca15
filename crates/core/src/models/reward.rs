//! Reward models: the five reward variants and the ledger entry

use crate::types::RewardId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reward variant produced by a spin or a scratch card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Sol,
    Usdt,
    Nft,
    #[serde(rename = "scratchcard")]
    ScratchCard,
    Replay,
}

impl RewardKind {
    /// All variants in weight-table declaration order
    pub const ALL: [RewardKind; 5] = [
        RewardKind::Sol,
        RewardKind::Usdt,
        RewardKind::Nft,
        RewardKind::ScratchCard,
        RewardKind::Replay,
    ];

    /// Whether this variant carries a numeric payout
    pub fn has_amount(&self) -> bool {
        matches!(self, RewardKind::Sol | RewardKind::Usdt)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RewardKind::Sol => "sol",
            RewardKind::Usdt => "usdt",
            RewardKind::Nft => "nft",
            RewardKind::ScratchCard => "scratchcard",
            RewardKind::Replay => "replay",
        }
    }
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sol" => Ok(RewardKind::Sol),
            "usdt" => Ok(RewardKind::Usdt),
            "nft" => Ok(RewardKind::Nft),
            "scratchcard" | "scratch" | "card" => Ok(RewardKind::ScratchCard),
            "replay" => Ok(RewardKind::Replay),
            other => Err(format!("unknown reward type: {}", other)),
        }
    }
}

/// A reward before the ledger assigns id, claim flag and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardDraft {
    pub kind: RewardKind,
    pub amount: Option<f64>,
    pub name: String,
    pub description: String,
}

impl RewardDraft {
    pub fn sol(amount: f64) -> Self {
        Self {
            kind: RewardKind::Sol,
            amount: Some(amount),
            name: format!("{} SOL", amount),
            description: format!("You won {} SOL!", amount),
        }
    }

    pub fn usdt(amount: f64) -> Self {
        Self {
            kind: RewardKind::Usdt,
            amount: Some(amount),
            name: format!("{} USDT", amount),
            description: format!("You won {} USDT!", amount),
        }
    }

    pub fn nft_booster() -> Self {
        Self {
            kind: RewardKind::Nft,
            amount: None,
            name: "NFT Booster".to_string(),
            description: "Lucky Spinner NFT: Increases your next spin reward by 50%".to_string(),
        }
    }

    pub fn scratch_card() -> Self {
        Self {
            kind: RewardKind::ScratchCard,
            amount: None,
            name: "Scratch Card".to_string(),
            description: "You won a free scratch card!".to_string(),
        }
    }

    pub fn replay() -> Self {
        Self {
            kind: RewardKind::Replay,
            amount: None,
            name: "Replay Spin".to_string(),
            description: "Spin again without waiting for the cooldown!".to_string(),
        }
    }

    /// Payout won by scratching a card
    pub fn scratched(kind: RewardKind, amount: f64) -> Self {
        let name = match kind {
            RewardKind::Usdt => "Small USDT Reward",
            _ => "Small SOL Reward",
        };
        Self {
            kind,
            amount: Some(amount),
            name: name.to_string(),
            description: "You scratched a card and won!".to_string(),
        }
    }
}

/// A finalized reward stored in the ledger
///
/// Immutable except for `claimed`, which only ever flips to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: RewardId,
    #[serde(rename = "type")]
    pub kind: RewardKind,
    /// Present only for SOL and USDT rewards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub name: String,
    pub description: String,
    pub claimed: bool,
    pub timestamp: DateTime<Utc>,
}

impl Reward {
    pub fn from_draft(draft: RewardDraft, id: RewardId, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: draft.kind,
            amount: draft.amount,
            name: draft.name,
            description: draft.description,
            claimed: false,
            timestamp,
        }
    }

    /// An unclaimed replay lets the holder skip the spin cooldown
    pub fn is_unclaimed_replay(&self) -> bool {
        self.kind == RewardKind::Replay && !self.claimed
    }

    /// True when `amount` is present exactly for the numeric variants
    pub fn amount_matches_kind(&self) -> bool {
        match self.amount {
            Some(a) => self.kind.has_amount() && a > 0.0,
            None => !self.kind.has_amount(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        let json = serde_json::to_string(&RewardKind::ScratchCard).unwrap();
        assert_eq!(json, "\"scratchcard\"");
        let kind: RewardKind = serde_json::from_str("\"usdt\"").unwrap();
        assert_eq!(kind, RewardKind::Usdt);
    }

    #[test]
    fn test_reward_serializes_type_field() {
        let reward = Reward::from_draft(
            RewardDraft::replay(),
            RewardId::from("abc"),
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        );
        let json = serde_json::to_value(&reward).unwrap();
        assert_eq!(json["type"], "replay");
        assert!(json.get("amount").is_none());
        assert_eq!(json["claimed"], false);
    }

    #[test]
    fn test_amount_present_only_for_currency() {
        let at = DateTime::from_timestamp(0, 0).unwrap();
        let sol = Reward::from_draft(RewardDraft::sol(0.0123), RewardId::from("a"), at);
        let nft = Reward::from_draft(RewardDraft::nft_booster(), RewardId::from("b"), at);
        assert!(sol.amount_matches_kind());
        assert!(nft.amount_matches_kind());

        let mut broken = nft.clone();
        broken.amount = Some(1.0);
        assert!(!broken.amount_matches_kind());
    }

    #[test]
    fn test_draft_display_text() {
        let draft = RewardDraft::sol(0.0123);
        assert_eq!(draft.name, "0.0123 SOL");
        assert_eq!(draft.description, "You won 0.0123 SOL!");
        assert_eq!(RewardDraft::scratched(RewardKind::Usdt, 0.25).name, "Small USDT Reward");
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("SOL".parse::<RewardKind>().unwrap(), RewardKind::Sol);
        assert_eq!("scratchcard".parse::<RewardKind>().unwrap(), RewardKind::ScratchCard);
        assert!("gold".parse::<RewardKind>().is_err());
    }
}
