//! Runtime configuration: environment credentials, CLI tuning knobs and
//! the rule set the casino core enforces.

use std::env;
use std::net::SocketAddr;
use std::time::Duration as StdDuration;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::games::types::GameKind;

pub const INITIAL_BALANCE: u64 = 1_000;
pub const MIN_BET: u64 = 50;
pub const MAX_BET: u64 = 5_000;
pub const DAILY_BONUS_MIN: u64 = 100;
pub const DAILY_BONUS_MAX: u64 = 500;
pub const DAILY_COOLDOWN_HOURS: i64 = 24;

pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SUSPENSE_MS: u64 = 1_200;

/// Monetary and timing rules the core runs with.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRules {
    pub initial_balance: u64,
    pub min_bet: u64,
    pub max_bet: u64,
    pub daily_bonus_min: u64,
    pub daily_bonus_max: u64,
    pub daily_cooldown_hours: i64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            initial_balance: INITIAL_BALANCE,
            min_bet: MIN_BET,
            max_bet: MAX_BET,
            daily_bonus_min: DAILY_BONUS_MIN,
            daily_bonus_max: DAILY_BONUS_MAX,
            daily_cooldown_hours: DAILY_COOLDOWN_HOURS,
        }
    }
}

impl GameRules {
    /// Rolling window between successful daily claims.
    pub fn cooldown(&self) -> Duration {
        Duration::hours(self.daily_cooldown_hours)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_balance == 0 {
            return Err(ConfigError::InvalidRules(
                "initial balance must be positive".to_string(),
            ));
        }
        if self.min_bet == 0 || self.min_bet > self.max_bet {
            return Err(ConfigError::InvalidRules(format!(
                "bet bounds are inverted or zero: min {} max {}",
                self.min_bet, self.max_bet
            )));
        }
        if self.daily_bonus_min > self.daily_bonus_max {
            return Err(ConfigError::InvalidRules(format!(
                "bonus bounds are inverted: min {} max {}",
                self.daily_bonus_min, self.daily_bonus_max
            )));
        }
        if self.daily_cooldown_hours <= 0 {
            return Err(ConfigError::InvalidRules(
                "daily cooldown must be at least one hour".to_string(),
            ));
        }
        for kind in GameKind::ALL {
            for &stake in kind.stake_menu() {
                if stake < self.min_bet || stake > self.max_bet {
                    return Err(ConfigError::InvalidRules(format!(
                        "menu stake {} for {} falls outside [{}, {}]",
                        stake, kind, self.min_bet, self.max_bet
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Full bot configuration assembled from the environment plus CLI flags.
#[derive(Clone, Debug)]
pub struct BotConfig {
    /// Chat platform credential. Required.
    pub token: String,
    /// Destination for forwarded support messages. Optional; absence turns
    /// `/support` into a polite apology.
    pub support_chat_id: Option<i64>,
    pub rules: GameRules,
    /// Health/metrics listener; `None` disables the ops surface.
    pub ops_addr: Option<SocketAddr>,
    pub poll_timeout_secs: u64,
    pub suspense_delay_ms: u64,
}

impl BotConfig {
    /// Read `BOT_TOKEN` and `SUPPORT_CHAT_ID` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = match lookup("BOT_TOKEN") {
            Some(token) if !token.trim().is_empty() => token,
            _ => return Err(ConfigError::MissingToken),
        };

        let support_chat_id = match lookup("SUPPORT_CHAT_ID") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigError::InvalidSupportChatId(raw))?,
            ),
            None => None,
        };

        let config = Self {
            token,
            support_chat_id,
            rules: GameRules::default(),
            ops_addr: None,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            suspense_delay_ms: DEFAULT_SUSPENSE_MS,
        };
        config.rules.validate()?;
        Ok(config)
    }

    pub fn poll_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.poll_timeout_secs)
    }

    pub fn suspense_delay(&self) -> StdDuration {
        StdDuration::from_millis(self.suspense_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_default_rules_are_valid() {
        assert!(GameRules::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_bet_bounds_rejected() {
        let rules = GameRules {
            min_bet: 600,
            max_bet: 500,
            ..GameRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_menu_stakes_must_fit_bounds() {
        // The slots menu reaches 500, so a max bet of 400 cannot work.
        let rules = GameRules {
            max_bet: 400,
            ..GameRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let result = BotConfig::from_lookup(env_with(&[]));
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_blank_token_is_fatal() {
        let result = BotConfig::from_lookup(env_with(&[("BOT_TOKEN", "  ")]));
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_support_chat_id_is_optional() {
        let config = BotConfig::from_lookup(env_with(&[("BOT_TOKEN", "123:abc")])).unwrap();
        assert_eq!(config.support_chat_id, None);
        assert_eq!(config.poll_timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);
    }

    #[test]
    fn test_support_chat_id_parses() {
        let config = BotConfig::from_lookup(env_with(&[
            ("BOT_TOKEN", "123:abc"),
            ("SUPPORT_CHAT_ID", "-1001234567890"),
        ]))
        .unwrap();
        assert_eq!(config.support_chat_id, Some(-1_001_234_567_890));
    }

    #[test]
    fn test_malformed_support_chat_id_is_fatal() {
        let result = BotConfig::from_lookup(env_with(&[
            ("BOT_TOKEN", "123:abc"),
            ("SUPPORT_CHAT_ID", "not-a-chat"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidSupportChatId(_))));
    }

    #[test]
    fn test_cooldown_helper_matches_hours() {
        let rules = GameRules::default();
        assert_eq!(rules.cooldown(), Duration::hours(24));
    }
}
