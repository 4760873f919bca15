//! Error types and Result alias for the game core

use thiserror::Error;

/// Main error type for game operations and snapshot handling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Spin not available yet: {remaining_secs}s until the cooldown ends")]
    CooldownActive { remaining_secs: i64 },

    #[error("Weekly free scratch card limit reached ({quota} per week)")]
    WeeklyLimitReached { quota: u32 },

    #[error("Scratch card not found: {0}")]
    CardNotFound(String),

    #[error("Reward not found: {0}")]
    RewardNotFound(String),

    #[error("Card already revealed: {0}")]
    AlreadyRevealed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Precondition failures raised by game operations. Callers surface these
    /// as a message and carry on.
    pub fn is_game_rule(&self) -> bool {
        matches!(
            self,
            Error::CooldownActive { .. }
                | Error::WeeklyLimitReached { .. }
                | Error::CardNotFound(_)
                | Error::RewardNotFound(_)
                | Error::AlreadyRevealed(_)
        )
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}
