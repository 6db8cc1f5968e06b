//! End-to-end wager flows against a scripted casino
//! Every scenario drives the public facade the same way the chat layer does.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use chipbot::clock::{Clock, ManualClock};
use chipbot::rng::{EntropyRng, ScriptedRng};
use chipbot::{Casino, ChipError, GameKind, GameRules};

fn scripted_casino(script: &[u64]) -> (Casino, Arc<ScriptedRng>, Arc<ManualClock>) {
    let rng = Arc::new(ScriptedRng::new(script));
    let clock = Arc::new(ManualClock::starting_at(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    let casino = Casino::new(GameRules::default(), rng.clone(), clock.clone());
    (casino, rng, clock)
}

#[test]
fn test_slot_jackpot_pays_ten_times_the_stake() {
    let (casino, rng, _) = scripted_casino(&[5, 5, 5]);

    let settled = casino.resolver().resolve(1, GameKind::SlotMachine, 300).unwrap();
    assert!(settled.outcome.win);
    assert_eq!(settled.outcome.multiplier, 10);
    assert_eq!(settled.outcome.payout, 3_000);

    let account = casino.ledger().get_or_create(1);
    assert_eq!(account.balance, 3_700);
    assert_eq!(account.games_played, 1);
    assert_eq!(account.total_winnings, 3_000);
    assert_eq!(rng.remaining(), 0);
}

#[test]
fn test_matching_outer_reels_alone_pay_nothing() {
    // Cherry, Lemon, Cherry: the outer reels agree but neither pair
    // touches the middle reel, so the line loses.
    let (casino, _, _) = scripted_casino(&[0, 1, 0]);

    let settled = casino.resolver().resolve(1, GameKind::SlotMachine, 500).unwrap();
    assert!(!settled.outcome.win);
    assert_eq!(settled.outcome.payout, 0);

    let account = casino.ledger().get_or_create(1);
    assert_eq!(account.balance, 500);
    assert_eq!(account.total_winnings, 0);
}

#[test]
fn test_number_guess_win_doubles_the_stake() {
    let (casino, _, _) = scripted_casino(&[7, 7]);

    let settled = casino.resolver().resolve(1, GameKind::NumberGuess, 100).unwrap();
    assert!(settled.outcome.win);
    assert_eq!(settled.outcome.payout, 200);
    assert_eq!(casino.ledger().get_or_create(1).balance, 1_100);
}

#[test]
fn test_daily_bonus_cooldown_boundaries() {
    let (casino, _, clock) = scripted_casino(&[250, 400]);

    println!("=== PHASE 1: first claim ===");
    let grant = casino.bonus().claim(1).unwrap();
    assert_eq!(grant.amount, 250);
    assert_eq!(grant.balance, 1_250);

    println!("=== PHASE 2: one second short of eligibility ===");
    clock.advance(Duration::hours(23) + Duration::minutes(59) + Duration::seconds(59));
    let err = casino.bonus().claim(1).unwrap_err();
    match err {
        ChipError::CooldownActive { next_eligible } => {
            assert_eq!(next_eligible - clock.now(), Duration::seconds(1));
        }
        other => panic!("expected a cooldown, got {other:?}"),
    }
    assert_eq!(casino.ledger().get_or_create(1).balance, 1_250);

    println!("=== PHASE 3: exactly 24 hours after the claim ===");
    clock.advance(Duration::seconds(1));
    let grant = casino.bonus().claim(1).unwrap();
    assert_eq!(grant.amount, 400);
    assert_eq!(grant.balance, 1_650);
}

#[test]
fn test_leaderboard_orders_by_balance_then_seniority() {
    // Player 10 loses a spin; 20 and 30 never play and tie at the
    // starting balance, so the earlier account ranks higher.
    let (casino, _, _) = scripted_casino(&[0, 1, 2]);

    casino.resolver().resolve(10, GameKind::SlotMachine, 500).unwrap();
    casino.ledger().get_or_create(20);
    casino.ledger().get_or_create(30);

    let board = casino.ledger().snapshot_top(10);
    let ids: Vec<i64> = board.iter().map(|entry| entry.user_id).collect();
    assert_eq!(ids, vec![20, 30, 10]);
    assert_eq!(board[0].balance, 1_000);
    assert_eq!(board[2].balance, 500);
}

#[test]
fn test_stake_equal_to_balance_is_accepted_and_can_zero_out() {
    let (casino, rng, _) = scripted_casino(&[0, 1, 2, 3, 4, 5]);

    println!("=== PHASE 1: lose down to 500 chips ===");
    casino.resolver().resolve(1, GameKind::SlotMachine, 500).unwrap();
    assert_eq!(casino.ledger().get_or_create(1).balance, 500);

    println!("=== PHASE 2: wager the whole balance and lose it ===");
    let settled = casino.resolver().resolve(1, GameKind::SlotMachine, 500).unwrap();
    assert!(!settled.outcome.win);
    assert_eq!(settled.account.balance, 0);

    println!("=== PHASE 3: the next wager is rejected without a draw ===");
    assert_eq!(rng.remaining(), 0);
    let err = casino.resolver().resolve(1, GameKind::SlotMachine, 300).unwrap_err();
    assert!(matches!(
        err,
        ChipError::InsufficientFunds { stake: 300, balance: 0 }
    ));

    let account = casino.ledger().get_or_create(1);
    assert_eq!(account.balance, 0);
    assert_eq!(account.games_played, 2);
}

#[test]
fn test_rejected_wager_changes_nothing() {
    let (casino, rng, _) = scripted_casino(&[]);

    casino.ledger().with_account(1, |account| account.balance = 199);
    let before = casino.ledger().get_or_create(1);

    let err = casino.resolver().resolve(1, GameKind::NumberGuess, 200).unwrap_err();
    assert!(matches!(err, ChipError::InsufficientFunds { .. }));
    assert_eq!(casino.ledger().get_or_create(1), before);
    assert_eq!(rng.remaining(), 0);
}

#[test]
fn test_concurrent_wagers_conserve_chips() {
    let casino = Arc::new(Casino::new(
        GameRules::default(),
        Arc::new(EntropyRng::with_seed(42)),
        Arc::new(ManualClock::starting_at(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        )),
    ));
    let total_staked = Arc::new(AtomicU64::new(0));
    let total_paid = Arc::new(AtomicU64::new(0));

    let threads: Vec<_> = (0..4)
        .map(|thread_id| {
            let casino = Arc::clone(&casino);
            let total_staked = Arc::clone(&total_staked);
            let total_paid = Arc::clone(&total_paid);
            std::thread::spawn(move || {
                let user_id = 100 + thread_id;
                for _ in 0..20 {
                    let settled = casino
                        .resolver()
                        .resolve(user_id, GameKind::NumberGuess, 50)
                        .unwrap();
                    total_staked.fetch_add(settled.outcome.stake, Ordering::SeqCst);
                    total_paid.fetch_add(settled.outcome.payout, Ordering::SeqCst);
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().unwrap();
    }

    let stats = casino.ledger().stats();
    assert_eq!(stats.accounts, 4);
    assert_eq!(stats.games_played, 80);
    // Chips only move through wagers, so the books must balance.
    assert_eq!(
        stats.total_balance,
        4 * 1_000 - total_staked.load(Ordering::SeqCst) + total_paid.load(Ordering::SeqCst)
    );
    for user_id in 100..104 {
        let account = casino.ledger().get_or_create(user_id);
        assert_eq!(account.games_played, 20);
        assert_eq!(account.balance % 50, 0);
    }
}
