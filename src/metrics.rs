//! Service counters exported through the ops endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::games::SettledGame;
use crate::ledger::LedgerStats;

/// Monotonic counters for everything the bot does. Gauges come from the
/// ledger at scrape time.
#[derive(Debug, Default)]
pub struct CasinoMetrics {
    updates: AtomicU64,
    commands: AtomicU64,
    wagers: AtomicU64,
    wagers_won: AtomicU64,
    chips_staked: AtomicU64,
    chips_paid_out: AtomicU64,
    bonuses: AtomicU64,
    bonus_chips: AtomicU64,
    support_forwards: AtomicU64,
    errors: AtomicU64,
}

impl CasinoMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_command(&self) {
        self.commands.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_wager(&self, settled: &SettledGame) {
        self.wagers.fetch_add(1, Ordering::SeqCst);
        if settled.outcome.win {
            self.wagers_won.fetch_add(1, Ordering::SeqCst);
        }
        self.chips_staked.fetch_add(settled.outcome.stake, Ordering::SeqCst);
        self.chips_paid_out.fetch_add(settled.outcome.payout, Ordering::SeqCst);
    }

    pub fn record_bonus(&self, amount: u64) {
        self.bonuses.fetch_add(1, Ordering::SeqCst);
        self.bonus_chips.fetch_add(amount, Ordering::SeqCst);
    }

    pub fn record_support_forward(&self) {
        self.support_forwards.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }

    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> u64 {
        self.commands.load(Ordering::SeqCst)
    }

    pub fn wagers(&self) -> u64 {
        self.wagers.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::SeqCst)
    }

    /// Render in Prometheus text exposition format.
    pub fn to_prometheus_format(&self, stats: &LedgerStats) -> String {
        let mut out = String::new();
        counter(
            &mut out,
            "chipbot_updates_total",
            "Chat updates processed",
            self.updates.load(Ordering::SeqCst),
        );
        counter(
            &mut out,
            "chipbot_commands_total",
            "Slash commands handled",
            self.commands.load(Ordering::SeqCst),
        );
        counter(
            &mut out,
            "chipbot_wagers_total",
            "Wagers settled",
            self.wagers.load(Ordering::SeqCst),
        );
        counter(
            &mut out,
            "chipbot_wagers_won_total",
            "Wagers settled as wins",
            self.wagers_won.load(Ordering::SeqCst),
        );
        counter(
            &mut out,
            "chipbot_chips_staked_total",
            "Chips staked across all wagers",
            self.chips_staked.load(Ordering::SeqCst),
        );
        counter(
            &mut out,
            "chipbot_chips_paid_out_total",
            "Chips paid back out across all wagers",
            self.chips_paid_out.load(Ordering::SeqCst),
        );
        counter(
            &mut out,
            "chipbot_bonuses_claimed_total",
            "Daily bonuses granted",
            self.bonuses.load(Ordering::SeqCst),
        );
        counter(
            &mut out,
            "chipbot_bonus_chips_total",
            "Chips granted as daily bonuses",
            self.bonus_chips.load(Ordering::SeqCst),
        );
        counter(
            &mut out,
            "chipbot_support_forwards_total",
            "Messages relayed to the support channel",
            self.support_forwards.load(Ordering::SeqCst),
        );
        counter(
            &mut out,
            "chipbot_errors_total",
            "Updates that ended in an error reply",
            self.errors.load(Ordering::SeqCst),
        );
        gauge(
            &mut out,
            "chipbot_accounts",
            "Player accounts in the ledger",
            stats.accounts,
        );
        gauge(
            &mut out,
            "chipbot_chips_in_play",
            "Chips held across all accounts",
            stats.total_balance,
        );
        gauge(
            &mut out,
            "chipbot_games_played",
            "Games played across all accounts",
            stats.games_played,
        );
        gauge(
            &mut out,
            "chipbot_total_winnings",
            "Gross winnings across all accounts",
            stats.total_winnings,
        );
        out
    }
}

fn counter(out: &mut String, name: &str, help: &str, value: u64) {
    out.push_str(&format!("# HELP {name} {help}\n"));
    out.push_str(&format!("# TYPE {name} counter\n"));
    out.push_str(&format!("{name} {value}\n"));
}

fn gauge(out: &mut String, name: &str, help: &str, value: u64) {
    out.push_str(&format!("# HELP {name} {help}\n"));
    out.push_str(&format!("# TYPE {name} gauge\n"));
    out.push_str(&format!("{name} {value}\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::games::{GameKind, Outcome, OutcomeDetail};
    use crate::ledger::Ledger;

    fn settled_win() -> SettledGame {
        SettledGame {
            round_id: Uuid::new_v4(),
            user_id: 1,
            outcome: Outcome::settled(
                GameKind::NumberGuess,
                100,
                2,
                OutcomeDetail::NumberGuess {
                    winning: 7,
                    guess: 7,
                },
            ),
            account: Ledger::new(1_000).get_or_create(1),
        }
    }

    #[test]
    fn test_wager_counters_split_wins_from_losses() {
        let metrics = CasinoMetrics::new();
        metrics.record_wager(&settled_win());
        let mut loss = settled_win();
        loss.outcome = Outcome::settled(
            GameKind::SlotMachine,
            300,
            0,
            OutcomeDetail::SlotMachine {
                reels: [crate::games::SlotSymbol::Cherry; 3],
            },
        );
        metrics.record_wager(&loss);

        let text = metrics.to_prometheus_format(&LedgerStats::default());
        assert!(text.contains("chipbot_wagers_total 2"));
        assert!(text.contains("chipbot_wagers_won_total 1"));
        assert!(text.contains("chipbot_chips_staked_total 400"));
        assert!(text.contains("chipbot_chips_paid_out_total 200"));
    }

    #[test]
    fn test_exposition_format_declares_types() {
        let metrics = CasinoMetrics::new();
        metrics.record_update();
        let stats = LedgerStats {
            accounts: 3,
            total_balance: 2_500,
            games_played: 7,
            total_winnings: 900,
        };
        let text = metrics.to_prometheus_format(&stats);
        assert!(text.contains("# TYPE chipbot_updates_total counter"));
        assert!(text.contains("chipbot_updates_total 1"));
        assert!(text.contains("# TYPE chipbot_accounts gauge"));
        assert!(text.contains("chipbot_accounts 3"));
        assert!(text.contains("chipbot_chips_in_play 2500"));
    }
}
