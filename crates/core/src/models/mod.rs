//! Data models for the game

mod game_state;
mod reward;
mod scratch_card;
mod stats;

pub use game_state::*;
pub use reward::*;
pub use scratch_card::*;
pub use stats::*;
