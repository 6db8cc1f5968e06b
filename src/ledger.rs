//! User-account ledger, the single authority for monetary state.
//!
//! Accounts are created lazily on first touch, live in memory for the
//! process lifetime and are mutated only under their own mutex. State is
//! intentionally volatile; a restart starts everyone over.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{ChipError, ChipResult};

pub type UserId = i64;

/// Per-user ledger record. Mutated only through [`Ledger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub user_id: UserId,
    pub balance: u64,
    pub last_claim: Option<DateTime<Utc>>,
    pub games_played: u64,
    pub total_winnings: u64,
    created_seq: u64,
}

impl Account {
    fn new(user_id: UserId, balance: u64, created_seq: u64) -> Self {
        Self {
            user_id,
            balance,
            last_claim: None,
            games_played: 0,
            total_winnings: 0,
            created_seq,
        }
    }

    /// Settle one wager: debit the stake, credit the payout, bump the
    /// counters. Leaves the account untouched when the balance cannot
    /// cover the stake.
    pub fn apply_wager(&mut self, stake: u64, payout: u64) -> ChipResult<()> {
        if self.balance < stake {
            return Err(ChipError::InsufficientFunds {
                stake,
                balance: self.balance,
            });
        }
        self.balance = self.balance - stake + payout;
        self.games_played += 1;
        self.total_winnings += payout;
        Ok(())
    }

    /// Record a granted daily bonus. Eligibility is the bonus clock's job;
    /// the ledger only applies the credit.
    pub fn credit_bonus(&mut self, amount: u64, now: DateTime<Utc>) {
        debug_assert!(self.last_claim.map_or(true, |prev| now >= prev));
        self.balance += amount;
        self.last_claim = Some(now);
    }

    /// Position in account-creation order, the leaderboard tie-break.
    pub fn created_seq(&self) -> u64 {
        self.created_seq
    }
}

/// Ordered leaderboard row.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub balance: u64,
}

/// Aggregate counters across all accounts.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LedgerStats {
    pub accounts: u64,
    pub total_balance: u64,
    pub games_played: u64,
    pub total_winnings: u64,
}

/// The account map: an outer lock for creation and lookup, one mutex per
/// account for mutation. Holders of an account mutex never wait on the map
/// lock, so lock order is acyclic.
pub struct Ledger {
    accounts: RwLock<HashMap<UserId, Arc<Mutex<Account>>>>,
    created: AtomicU64,
    initial_balance: u64,
}

impl Ledger {
    pub fn new(initial_balance: u64) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            created: AtomicU64::new(0),
            initial_balance,
        }
    }

    fn slot(&self, user_id: UserId) -> Arc<Mutex<Account>> {
        if let Some(slot) = self.accounts.read().unwrap().get(&user_id) {
            return Arc::clone(slot);
        }
        let mut accounts = self.accounts.write().unwrap();
        // Whoever won the race between the read above and this write lock
        // owns the slot; everyone else reuses it.
        Arc::clone(accounts.entry(user_id).or_insert_with(|| {
            let seq = self.created.fetch_add(1, Ordering::SeqCst);
            Arc::new(Mutex::new(Account::new(user_id, self.initial_balance, seq)))
        }))
    }

    /// Run `f` inside the user's critical section, materializing the
    /// account on first touch. Resolver and bonus clock build on this to
    /// keep check-then-mutate sequences atomic.
    pub fn with_account<T>(&self, user_id: UserId, f: impl FnOnce(&mut Account) -> T) -> T {
        let slot = self.slot(user_id);
        let mut account = slot.lock().unwrap();
        f(&mut account)
    }

    /// Idempotent lookup-or-create. Returns a copy; the live record never
    /// leaves the ledger.
    pub fn get_or_create(&self, user_id: UserId) -> Account {
        self.with_account(user_id, |account| account.clone())
    }

    /// Atomically settle a wager for `user_id`.
    pub fn apply_wager(&self, user_id: UserId, stake: u64, payout: u64) -> ChipResult<Account> {
        self.with_account(user_id, |account| {
            account.apply_wager(stake, payout)?;
            Ok(account.clone())
        })
    }

    /// Credit a daily bonus and stamp the claim instant.
    pub fn credit_bonus(&self, user_id: UserId, amount: u64, now: DateTime<Utc>) -> Account {
        self.with_account(user_id, |account| {
            account.credit_bonus(amount, now);
            account.clone()
        })
    }

    /// Top `n` accounts by balance at a single logical instant: the map
    /// read lock blocks creations while accounts are copied under their
    /// own locks in ascending id order.
    pub fn snapshot_top(&self, n: usize) -> Vec<LeaderboardEntry> {
        let accounts = self.accounts.read().unwrap();
        let mut slots: Vec<_> = accounts.iter().collect();
        slots.sort_by_key(|(id, _)| **id);

        let mut rows: Vec<(u64, u64, UserId)> = Vec::with_capacity(slots.len());
        for (id, slot) in slots {
            let account = slot.lock().unwrap();
            rows.push((account.balance, account.created_seq, *id));
        }

        rows.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        rows.truncate(n);
        rows.into_iter()
            .map(|(balance, _, user_id)| LeaderboardEntry { user_id, balance })
            .collect()
    }

    /// Aggregate counters, read the same way the snapshot is.
    pub fn stats(&self) -> LedgerStats {
        let accounts = self.accounts.read().unwrap();
        let mut stats = LedgerStats::default();
        for slot in accounts.values() {
            let account = slot.lock().unwrap();
            stats.accounts += 1;
            stats.total_balance += account.balance;
            stats.games_played += account.games_played;
            stats.total_winnings += account.total_winnings;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ledger() -> Ledger {
        Ledger::new(1_000)
    }

    #[test]
    fn test_first_touch_materializes_defaults() {
        let ledger = ledger();
        let account = ledger.get_or_create(7);
        assert_eq!(account.user_id, 7);
        assert_eq!(account.balance, 1_000);
        assert_eq!(account.last_claim, None);
        assert_eq!(account.games_played, 0);
        assert_eq!(account.total_winnings, 0);
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let ledger = ledger();
        let first = ledger.get_or_create(7);
        let second = ledger.get_or_create(7);
        assert_eq!(first, second);
        assert_eq!(ledger.stats().accounts, 1);
    }

    #[test]
    fn test_wager_moves_balance_and_counters() {
        let ledger = ledger();
        let account = ledger.apply_wager(1, 300, 900).unwrap();
        assert_eq!(account.balance, 1_000 - 300 + 900);
        assert_eq!(account.games_played, 1);
        assert_eq!(account.total_winnings, 900);
    }

    #[test]
    fn test_losing_wager_only_debits() {
        let ledger = ledger();
        let account = ledger.apply_wager(1, 300, 0).unwrap();
        assert_eq!(account.balance, 700);
        assert_eq!(account.games_played, 1);
        assert_eq!(account.total_winnings, 0);
    }

    #[test]
    fn test_rejected_wager_leaves_account_unchanged() {
        let ledger = ledger();
        let before = ledger.get_or_create(1);
        let err = ledger.apply_wager(1, 1_001, 0).unwrap_err();
        assert!(matches!(
            err,
            ChipError::InsufficientFunds {
                stake: 1_001,
                balance: 1_000
            }
        ));
        assert_eq!(ledger.get_or_create(1), before);
    }

    #[test]
    fn test_stake_equal_to_balance_is_accepted() {
        let ledger = ledger();
        let lost = ledger.apply_wager(1, 1_000, 0).unwrap();
        assert_eq!(lost.balance, 0);

        let won = ledger.apply_wager(2, 1_000, 3_000).unwrap();
        assert_eq!(won.balance, 3_000);
    }

    #[test]
    fn test_balance_never_goes_negative() {
        let ledger = ledger();
        ledger.apply_wager(1, 1_000, 0).unwrap();
        // Balance is now zero; even the minimum stake must bounce.
        assert!(ledger.apply_wager(1, 50, 100).is_err());
        assert_eq!(ledger.get_or_create(1).balance, 0);
    }

    #[test]
    fn test_bonus_credit_sets_last_claim() {
        let ledger = ledger();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let account = ledger.credit_bonus(1, 250, now);
        assert_eq!(account.balance, 1_250);
        assert_eq!(account.last_claim, Some(now));
    }

    #[test]
    fn test_snapshot_orders_by_balance_then_creation() {
        let ledger = ledger();
        // A, B, C created in order; A and C tie on balance.
        ledger.apply_wager(100, 500, 0).unwrap(); // A: 500
        ledger.get_or_create(200); // B: 1000
        ledger.apply_wager(300, 500, 0).unwrap(); // C: 500

        let top = ledger.snapshot_top(3);
        assert_eq!(
            top,
            vec![
                LeaderboardEntry { user_id: 200, balance: 1_000 },
                LeaderboardEntry { user_id: 100, balance: 500 },
                LeaderboardEntry { user_id: 300, balance: 500 },
            ]
        );
    }

    #[test]
    fn test_snapshot_is_sorted_descending() {
        let ledger = ledger();
        for id in 0..20 {
            ledger.apply_wager(id, 50, (id as u64 % 7) * 100).unwrap();
        }
        let top = ledger.snapshot_top(10);
        assert_eq!(top.len(), 10);
        for pair in top.windows(2) {
            assert!(pair[0].balance >= pair[1].balance);
        }
    }

    #[test]
    fn test_snapshot_truncates_to_n() {
        let ledger = ledger();
        for id in 0..5 {
            ledger.get_or_create(id);
        }
        assert_eq!(ledger.snapshot_top(3).len(), 3);
        assert_eq!(ledger.snapshot_top(0).len(), 0);
        assert_eq!(ledger.snapshot_top(50).len(), 5);
    }

    #[test]
    fn test_stats_aggregate_all_accounts() {
        let ledger = ledger();
        ledger.apply_wager(1, 100, 200).unwrap();
        ledger.apply_wager(2, 100, 0).unwrap();
        let stats = ledger.stats();
        assert_eq!(stats.accounts, 2);
        assert_eq!(stats.total_balance, 1_100 + 900);
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.total_winnings, 200);
    }

    #[test]
    fn test_same_user_wagers_serialize_across_threads() {
        let ledger = Arc::new(Ledger::new(100_000));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = Arc::clone(&ledger);
            handles.push(std::thread::spawn(move || {
                for _ in 0..500 {
                    ledger.apply_wager(1, 10, 0).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        let account = ledger.get_or_create(1);
        assert_eq!(account.balance, 100_000 - 8 * 500 * 10);
        assert_eq!(account.games_played, 8 * 500);
    }

    #[test]
    fn test_distinct_users_do_not_interfere() {
        let ledger = Arc::new(ledger());
        let mut handles = Vec::new();
        for id in 0..8 {
            let ledger = Arc::clone(&ledger);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    ledger.apply_wager(id, 10, 10).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        let stats = ledger.stats();
        assert_eq!(stats.accounts, 8);
        assert_eq!(stats.total_balance, 8 * 1_000);
        assert_eq!(stats.games_played, 800);
    }
}
