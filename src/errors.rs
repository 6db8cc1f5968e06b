//! Error taxonomy for the casino core and its adapters.
//!
//! Core operations return tagged errors; the chat adapter turns them into
//! user-visible text and never lets a user-triggered failure take the
//! process down.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::games::types::GameKind;

/// Convenience alias used throughout the crate.
pub type ChipResult<T> = Result<T, ChipError>;

/// Root error type for all casino operations.
#[derive(Debug, Error)]
pub enum ChipError {
    #[error("insufficient funds: stake {stake} exceeds balance {balance}")]
    InsufficientFunds { stake: u64, balance: u64 },

    #[error("daily bonus on cooldown until {next_eligible}")]
    CooldownActive { next_eligible: DateTime<Utc> },

    #[error("stake {stake} is not on the {kind} menu")]
    InvalidStake { kind: GameKind, stake: u64 },

    #[error("support channel is not configured")]
    SupportUnavailable,

    #[error("support message delivery failed: {0}")]
    SupportDeliveryFailed(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ChipError {
    /// True for errors a player can trigger through normal play. These get
    /// a friendly reply and a quiet log line; everything else is logged as
    /// a failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ChipError::InsufficientFunds { .. }
                | ChipError::CooldownActive { .. }
                | ChipError::InvalidStake { .. }
                | ChipError::SupportUnavailable
        )
    }
}

/// Startup configuration problems. All of these are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN is not set; the bot cannot authenticate with the chat platform")]
    MissingToken,

    #[error("SUPPORT_CHAT_ID is not a valid chat id: {0:?}")]
    InvalidSupportChatId(String),

    #[error("invalid game rules: {0}")]
    InvalidRules(String),
}

/// Failures talking to the chat platform.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat api rejected the call: {0}")]
    Api(String),

    #[error("update polling failed {0} times in a row")]
    PollBudgetExhausted(u32),
}
