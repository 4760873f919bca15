//! SpinToEarn Engine - Reward generation, spin cooldowns, scratch cards, and ledgers

pub mod clock;
pub mod game;
pub mod generator;
pub mod purchase;
pub mod wallet;

pub use clock::{Clock, ManualClock, SystemClock};
pub use game::{format_countdown, next_streak, Game};
pub use generator::RewardEngine;
pub use purchase::{buy_scratch_card, PaidCard, PurchaseError};
pub use wallet::{Chain, Gate, Wallet, WalletError, WalletKind, WalletProvider, WalletSession};
