//! Wager resolution: stake validation, draw, and ledger settlement as
//! one atomic per-user step.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::config::GameRules;
use crate::errors::{ChipError, ChipResult};
use crate::games::types::{GameKind, Outcome};
use crate::games::{number_guess, slots};
use crate::ledger::{Account, Ledger, UserId};
use crate::rng::RandomSource;

/// A settled round together with the account it left behind.
#[derive(Debug, Clone)]
pub struct SettledGame {
    pub round_id: Uuid,
    pub user_id: UserId,
    pub outcome: Outcome,
    pub account: Account,
}

/// Resolves wagers against the ledger with a shared randomness source.
pub struct GameResolver {
    ledger: Arc<Ledger>,
    rng: Arc<dyn RandomSource>,
    rules: GameRules,
}

impl GameResolver {
    pub fn new(ledger: Arc<Ledger>, rng: Arc<dyn RandomSource>, rules: GameRules) -> Self {
        Self { ledger, rng, rules }
    }

    /// Reject stakes outside the game's menu or the table limits.
    pub fn check_stake(&self, kind: GameKind, stake: u64) -> ChipResult<()> {
        if stake < self.rules.min_bet || stake > self.rules.max_bet {
            return Err(ChipError::InvalidStake { kind, stake });
        }
        if !kind.stake_menu().contains(&stake) {
            return Err(ChipError::InvalidStake { kind, stake });
        }
        Ok(())
    }

    /// Run one wager end to end: validate the stake, check funds, draw,
    /// and settle. The draw happens only after the balance check, so a
    /// rejected wager consumes no randomness.
    pub fn resolve(&self, user_id: UserId, kind: GameKind, stake: u64) -> ChipResult<SettledGame> {
        self.check_stake(kind, stake)?;

        let (outcome, account) = self.ledger.with_account(user_id, |account| {
            if account.balance < stake {
                return Err(ChipError::InsufficientFunds {
                    stake,
                    balance: account.balance,
                });
            }
            let outcome = self.draw(kind, stake);
            account.apply_wager(stake, outcome.payout)?;
            Ok((outcome, account.clone()))
        })?;

        let settled = SettledGame {
            round_id: Uuid::new_v4(),
            user_id,
            outcome,
            account,
        };
        if settled.outcome.win {
            info!(
                "🎉 {} win: user {} staked {} and collected {} ({}x), round {}",
                settled.outcome.kind,
                user_id,
                stake,
                settled.outcome.payout,
                settled.outcome.multiplier,
                settled.round_id
            );
        } else {
            info!(
                "🎲 {} loss: user {} staked {}, round {}",
                settled.outcome.kind, user_id, stake, settled.round_id
            );
        }
        Ok(settled)
    }

    fn draw(&self, kind: GameKind, stake: u64) -> Outcome {
        match kind {
            GameKind::NumberGuess => number_guess::play(self.rng.as_ref(), stake),
            GameKind::SlotMachine => slots::play(self.rng.as_ref(), stake),
        }
    }
}
