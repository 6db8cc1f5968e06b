//! Message rendering: every user-facing string in one place.

use chrono::{DateTime, Utc};

use crate::bonus::BonusGrant;
use crate::chat::event::{Button, Keyboard};
use crate::errors::ChipError;
use crate::games::{GameKind, OutcomeDetail, SettledGame};
use crate::ledger::{Account, LeaderboardEntry, UserId};

/// Dollar figure with thousands separators, no currency sign.
pub fn money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Display name for users we have never seen speak.
pub fn fallback_name(user_id: UserId) -> String {
    format!("User{user_id}")
}

/// Greeting for /start, fresh and returning users alike.
pub fn welcome(name: &str, account: &Account) -> String {
    format!(
        "🎰 Welcome to the casino, {name}!\n\n\
         You have ${} in chips.\n\n\
         /play - pick a game and a stake\n\
         /balance - check your chips\n\
         /daily - claim a daily bonus\n\
         /leaderboard - top players\n\
         /support - talk to a human",
        money(account.balance)
    )
}

pub fn balance_text(account: &Account) -> String {
    format!(
        "💰 Balance: ${}\n🎮 Games played: {}\n🏆 Total winnings: ${}",
        money(account.balance),
        account.games_played,
        money(account.total_winnings)
    )
}

pub fn bonus_text(grant: &BonusGrant) -> String {
    format!(
        "🎁 Daily bonus: ${}!\n💰 New balance: ${}",
        money(grant.amount),
        money(grant.balance)
    )
}

/// Remaining wait rendered as whole hours and floored minutes.
pub fn cooldown_text(next_eligible: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (next_eligible - now).num_minutes().max(0);
    format!(
        "⏳ Daily bonus on cooldown. Come back in {}h {}m.",
        minutes / 60,
        minutes % 60
    )
}

fn kind_label(kind: GameKind) -> &'static str {
    match kind {
        GameKind::NumberGuess => "🔢 Guess",
        GameKind::SlotMachine => "🎰 Slots",
    }
}

/// Stake picker: one keyboard row per game, one button per stake.
pub fn game_menu() -> (String, Keyboard) {
    let rows = GameKind::ALL
        .iter()
        .map(|kind| {
            kind.stake_menu()
                .iter()
                .map(|stake| {
                    Button::new(
                        format!("{} ${}", kind_label(*kind), money(*stake)),
                        format!("wager:{}:{}", kind.payload_key(), stake),
                    )
                })
                .collect()
        })
        .collect();
    ("🎮 Pick a game and a stake:".to_string(), Keyboard::new(rows))
}

pub fn wager_ack(kind: GameKind, stake: u64) -> String {
    match kind {
        GameKind::NumberGuess => format!("🔢 ${} down. Drawing numbers...", money(stake)),
        GameKind::SlotMachine => format!("🎰 ${} down. Reels spinning...", money(stake)),
    }
}

pub fn outcome_text(settled: &SettledGame) -> String {
    let mut text = match &settled.outcome.detail {
        OutcomeDetail::NumberGuess { winning, guess } => {
            format!("🎯 The number was {winning}, your guess was {guess}.")
        }
        OutcomeDetail::SlotMachine { reels } => {
            format!("🎰 {} {} {}", reels[0], reels[1], reels[2])
        }
    };
    if settled.outcome.win {
        text.push_str(&format!(
            "\n🎉 You win ${} ({}x)!",
            money(settled.outcome.payout),
            settled.outcome.multiplier
        ));
    } else {
        text.push_str("\n😢 No win this time.");
    }
    text.push_str(&format!("\n💰 Balance: ${}", money(settled.account.balance)));
    text
}

/// Top balances with medals for the podium and numbers below it.
pub fn leaderboard_text<F>(entries: &[LeaderboardEntry], mut name_of: F) -> String
where
    F: FnMut(UserId) -> String,
{
    if entries.is_empty() {
        return "🏆 Leaderboard\n\nNo players yet. /play to claim the top spot!".to_string();
    }
    let mut out = String::from("🏆 Leaderboard\n");
    for (rank, entry) in entries.iter().enumerate() {
        let badge = match rank {
            0 => "🥇".to_string(),
            1 => "🥈".to_string(),
            2 => "🥉".to_string(),
            _ => format!("{}.", rank + 1),
        };
        out.push_str(&format!(
            "\n{} {}: ${}",
            badge,
            name_of(entry.user_id),
            money(entry.balance)
        ));
    }
    out
}

pub fn support_prompt() -> String {
    "📨 Send your message and we'll forward it to the team. One message per request.".to_string()
}

pub fn support_sent() -> String {
    "✅ Your message is on its way to support.".to_string()
}

pub fn unknown_hint() -> String {
    "🤔 I didn't catch that. Try /play, /balance, /daily, /leaderboard, or /support.".to_string()
}

/// User-facing rendering for every error the bot can surface.
pub fn describe_error(err: &ChipError, now: DateTime<Utc>) -> String {
    match err {
        ChipError::InsufficientFunds { stake, balance } => format!(
            "🚫 Not enough chips: that wager needs ${} but you have ${}.\n\
             Claim your /daily bonus to top up.",
            money(*stake),
            money(*balance)
        ),
        ChipError::CooldownActive { next_eligible } => cooldown_text(*next_eligible, now),
        ChipError::InvalidStake { kind, stake } => format!(
            "🚫 ${} is not a {kind} stake. Pick one from /play.",
            money(*stake)
        ),
        ChipError::SupportUnavailable => {
            "🔇 Support is not set up right now. Please try again later.".to_string()
        }
        ChipError::SupportDeliveryFailed(_) => {
            "⚠️ We couldn't deliver your message to support. Please try again later.".to_string()
        }
        _ => "⚠️ Something went wrong on our side. Your chips are safe, please try again."
            .to_string(),
    }
}
