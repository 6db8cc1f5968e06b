//! Daily bonus clock: one claim per rolling 24-hour window.
//!
//! The cooldown runs from the previous claim instant, not a calendar-day
//! boundary. A claim at exactly the cooldown mark succeeds.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;
use crate::config::GameRules;
use crate::errors::{ChipError, ChipResult};
use crate::ledger::{Ledger, UserId};
use crate::rng::RandomSource;

/// A successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusGrant {
    pub amount: u64,
    pub balance: u64,
    pub claimed_at: DateTime<Utc>,
}

pub struct DailyBonus {
    ledger: Arc<Ledger>,
    rng: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    cooldown: Duration,
    amount_min: u64,
    amount_max: u64,
}

impl DailyBonus {
    pub fn new(
        ledger: Arc<Ledger>,
        rng: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
        rules: &GameRules,
    ) -> Self {
        Self {
            ledger,
            rng,
            clock,
            cooldown: rules.cooldown(),
            amount_min: rules.daily_bonus_min,
            amount_max: rules.daily_bonus_max,
        }
    }

    /// Claim the bonus. Gate check and credit share the account's critical
    /// section, so two racing claims cannot both pass.
    pub fn claim(&self, user_id: UserId) -> ChipResult<BonusGrant> {
        let now = self.clock.now();
        self.ledger.with_account(user_id, |account| {
            if let Some(last) = account.last_claim {
                let next_eligible = last + self.cooldown;
                if now < next_eligible {
                    return Err(ChipError::CooldownActive { next_eligible });
                }
            }
            let amount = self.rng.roll_range(self.amount_min, self.amount_max);
            account.credit_bonus(amount, now);
            Ok(BonusGrant {
                amount,
                balance: account.balance,
                claimed_at: now,
            })
        })
    }
}
