//! Chipbot - Chat-Operated Mini-Casino
//!
//! Play-money wagering over chat: a ledger of chip accounts, two games
//! of chance, a daily bonus clock, and a Telegram front end. Everything
//! settles in memory; restarts start everyone over.

use std::sync::Arc;

pub mod bonus;
pub mod chat;
pub mod clock;
pub mod config;
pub mod errors;
pub mod games;
pub mod ledger;
pub mod metrics;
pub mod ops;
pub mod rng;
pub mod telegram;

pub use bonus::DailyBonus;
pub use clock::{Clock, SystemClock};
pub use config::{BotConfig, GameRules};
pub use errors::{ChipError, ChipResult};
pub use games::{GameKind, GameResolver, Outcome, SettledGame};
pub use ledger::{Account, Ledger, UserId};
pub use metrics::CasinoMetrics;
pub use rng::{EntropyRng, RandomSource};

/// The casino: ledger, resolver, and bonus clock wired to one rule set.
/// Randomness and time come in through the constructor, so tests drive
/// both.
pub struct Casino {
    rules: GameRules,
    ledger: Arc<Ledger>,
    resolver: GameResolver,
    bonus: DailyBonus,
    clock: Arc<dyn Clock>,
}

impl Casino {
    pub fn new(rules: GameRules, rng: Arc<dyn RandomSource>, clock: Arc<dyn Clock>) -> Self {
        let ledger = Arc::new(Ledger::new(rules.initial_balance));
        let resolver = GameResolver::new(Arc::clone(&ledger), Arc::clone(&rng), rules.clone());
        let bonus = DailyBonus::new(
            Arc::clone(&ledger),
            Arc::clone(&rng),
            Arc::clone(&clock),
            &rules,
        );
        Self {
            rules,
            ledger,
            resolver,
            bonus,
            clock,
        }
    }

    /// Production wiring: OS entropy and the system clock.
    pub fn with_defaults(rules: GameRules) -> Self {
        Self::new(rules, Arc::new(EntropyRng::new()), Arc::new(SystemClock))
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn resolver(&self) -> &GameResolver {
        &self.resolver
    }

    pub fn bonus(&self) -> &DailyBonus {
        &self.bonus
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
