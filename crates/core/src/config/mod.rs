//! Game configuration
//!
//! Every constant the reward engine and the schedulers rely on lives here so
//! the admin screen can tune it and the store can persist it.

use crate::errors::{Error, Result};
use crate::models::RewardKind;
use crate::types::round_to_decimals;
use serde::{Deserialize, Serialize};

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Longest allowed spin cooldown (one year)
pub const MAX_SPIN_COOLDOWN_SECS: i64 = 365 * 24 * 60 * 60;

/// Draw probability per reward variant (must sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardWeights {
    pub sol: f64,
    pub usdt: f64,
    pub nft: f64,
    pub scratchcard: f64,
    pub replay: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            sol: 0.05,
            usdt: 0.10,
            nft: 0.05,
            scratchcard: 0.30,
            replay: 0.50,
        }
    }
}

impl RewardWeights {
    /// Build from whole percentages as entered on the admin screen
    pub fn from_percentages(sol: u32, usdt: u32, nft: u32, scratchcard: u32, replay: u32) -> Result<Self> {
        let total: u64 = [sol, usdt, nft, scratchcard, replay]
            .iter()
            .map(|&p| u64::from(p))
            .sum();
        if total != 100 {
            return Err(Error::InvalidConfig(format!(
                "Probabilities must sum to 100% (got {}%)",
                total
            )));
        }
        Ok(Self {
            sol: sol as f64 / 100.0,
            usdt: usdt as f64 / 100.0,
            nft: nft as f64 / 100.0,
            scratchcard: scratchcard as f64 / 100.0,
            replay: replay as f64 / 100.0,
        })
    }

    pub fn weight(&self, kind: RewardKind) -> f64 {
        match kind {
            RewardKind::Sol => self.sol,
            RewardKind::Usdt => self.usdt,
            RewardKind::Nft => self.nft,
            RewardKind::ScratchCard => self.scratchcard,
            RewardKind::Replay => self.replay,
        }
    }

    /// Variants paired with their weight, in declaration order
    pub fn bands(&self) -> [(RewardKind, f64); 5] {
        RewardKind::ALL.map(|kind| (kind, self.weight(kind)))
    }

    pub fn total(&self) -> f64 {
        self.bands().iter().map(|(_, w)| w).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some((kind, w)) = self.bands().into_iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(Error::InvalidConfig(format!("weight for {} is invalid: {}", kind, w)));
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(Error::InvalidConfig(format!(
                "reward weights must sum to 1.0 (got {})",
                total
            )));
        }
        Ok(())
    }
}

/// Uniform payout interval `[min, max)` rounded to `decimals` places
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutRange {
    pub min: f64,
    pub max: f64,
    pub decimals: u32,
}

impl PayoutRange {
    pub const fn new(min: f64, max: f64, decimals: u32) -> Self {
        Self { min, max, decimals }
    }

    pub fn validate(&self, label: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min <= 0.0 || self.min >= self.max {
            return Err(Error::InvalidConfig(format!(
                "{} payout range [{}, {}) is invalid",
                label, self.min, self.max
            )));
        }
        // every draw must round to a positive amount
        let smallest = round_to_decimals(self.min, self.decimals);
        if smallest.is_nan() || smallest <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "{} payout minimum {} rounds to zero at {} decimals",
                label, self.min, self.decimals
            )));
        }
        Ok(())
    }
}

/// SOL and USDT payout intervals for one game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutTable {
    pub sol: PayoutRange,
    pub usdt: PayoutRange,
}

impl PayoutTable {
    pub fn spin_defaults() -> Self {
        Self {
            sol: PayoutRange::new(0.001, 0.021, 4),
            usdt: PayoutRange::new(0.1, 0.6, 2),
        }
    }

    pub fn scratch_defaults() -> Self {
        Self {
            sol: PayoutRange::new(0.002, 0.022, 4),
            usdt: PayoutRange::new(0.1, 0.6, 2),
        }
    }

    fn validate(&self, label: &str) -> Result<()> {
        self.sol.validate(&format!("{} SOL", label))?;
        self.usdt.validate(&format!("{} USDT", label))
    }
}

/// What happens to a replay reward once it has been used to skip the cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplayPolicy {
    /// The replay stays unclaimed until the player claims it
    #[default]
    Manual,
    /// Spinning through the cooldown claims the oldest unclaimed replay
    ConsumeOnSpin,
}

/// Price of a paid scratch card per chain, and where the payment goes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPricing {
    pub sol: f64,
    pub eth: f64,
    #[serde(default)]
    pub sol_treasury: Option<String>,
    #[serde(default)]
    pub eth_treasury: Option<String>,
}

impl Default for CardPricing {
    fn default() -> Self {
        Self {
            sol: 0.1,
            eth: 0.007955,
            sol_treasury: None,
            eth_treasury: None,
        }
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    /// Minimum seconds between two regular spins
    pub spin_cooldown_secs: i64,
    /// Free scratch cards a player may take per week
    pub free_cards_per_week: u32,
    pub weights: RewardWeights,
    pub spin_payouts: PayoutTable,
    pub scratch_payouts: PayoutTable,
    pub replay_policy: ReplayPolicy,
    pub card_price: CardPricing,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spin_cooldown_secs: 24 * 60 * 60,
            free_cards_per_week: 3,
            weights: RewardWeights::default(),
            spin_payouts: PayoutTable::spin_defaults(),
            scratch_payouts: PayoutTable::scratch_defaults(),
            replay_policy: ReplayPolicy::Manual,
            card_price: CardPricing::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_SPIN_COOLDOWN_SECS).contains(&self.spin_cooldown_secs) {
            return Err(Error::InvalidConfig(format!(
                "spin cooldown must be between 0 and {} seconds (got {})",
                MAX_SPIN_COOLDOWN_SECS, self.spin_cooldown_secs
            )));
        }
        self.weights.validate()?;
        self.spin_payouts.validate("spin")?;
        self.scratch_payouts.validate("scratch")?;
        if self.card_price.sol <= 0.0 || self.card_price.eth <= 0.0 {
            return Err(Error::InvalidConfig("card price must be positive".to_string()));
        }
        Ok(())
    }
}
