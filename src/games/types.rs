//! Game kinds, outcomes and the stake menus reachable from the chat UI.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Games the casino can resolve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    NumberGuess,
    SlotMachine,
}

impl GameKind {
    pub const ALL: [GameKind; 2] = [GameKind::NumberGuess, GameKind::SlotMachine];

    /// Stakes offered on the chat menu for this game.
    pub fn stake_menu(&self) -> &'static [u64] {
        match self {
            GameKind::NumberGuess => &[50, 100, 200],
            GameKind::SlotMachine => &[300, 500],
        }
    }

    /// Short id embedded in button payloads.
    pub fn payload_key(&self) -> &'static str {
        match self {
            GameKind::NumberGuess => "guess",
            GameKind::SlotMachine => "slots",
        }
    }

    pub fn from_payload_key(key: &str) -> Option<Self> {
        match key {
            "guess" => Some(GameKind::NumberGuess),
            "slots" => Some(GameKind::SlotMachine),
            _ => None,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::NumberGuess => write!(f, "number guess"),
            GameKind::SlotMachine => write!(f, "slot machine"),
        }
    }
}

/// One reel face on the slot machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SlotSymbol {
    Cherry,
    Lemon,
    Orange,
    Grapes,
    Bell,
    Diamond,
    Seven,
}

impl SlotSymbol {
    /// Reel order; draws index into this array.
    pub const ALL: [SlotSymbol; 7] = [
        SlotSymbol::Cherry,
        SlotSymbol::Lemon,
        SlotSymbol::Orange,
        SlotSymbol::Grapes,
        SlotSymbol::Bell,
        SlotSymbol::Diamond,
        SlotSymbol::Seven,
    ];

    pub fn emoji(&self) -> &'static str {
        match self {
            SlotSymbol::Cherry => "🍒",
            SlotSymbol::Lemon => "🍋",
            SlotSymbol::Orange => "🍊",
            SlotSymbol::Grapes => "🍇",
            SlotSymbol::Bell => "🔔",
            SlotSymbol::Diamond => "💎",
            SlotSymbol::Seven => "7️⃣",
        }
    }
}

impl fmt::Display for SlotSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.emoji())
    }
}

/// Settled result of a single wager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    pub kind: GameKind,
    pub win: bool,
    pub multiplier: u64,
    pub stake: u64,
    /// Gross amount credited: `multiplier * stake`, zero on a loss.
    pub payout: u64,
    #[serde(flatten)]
    pub detail: OutcomeDetail,
}

impl Outcome {
    pub fn settled(kind: GameKind, stake: u64, multiplier: u64, detail: OutcomeDetail) -> Self {
        Self {
            kind,
            win: multiplier > 0,
            multiplier,
            stake,
            payout: multiplier.saturating_mul(stake),
            detail,
        }
    }
}

/// Game-specific half of an outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum OutcomeDetail {
    NumberGuess { winning: u8, guess: u8 },
    SlotMachine { reels: [SlotSymbol; 3] },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_stakes_stay_inside_global_bounds() {
        for kind in GameKind::ALL {
            assert!(!kind.stake_menu().is_empty());
            for &stake in kind.stake_menu() {
                assert!(stake >= 50 && stake <= 5_000);
            }
        }
    }

    #[test]
    fn test_payload_keys_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_payload_key(kind.payload_key()), Some(kind));
        }
        assert_eq!(GameKind::from_payload_key("roulette"), None);
    }

    #[test]
    fn test_symbol_set_has_seven_faces() {
        assert_eq!(SlotSymbol::ALL.len(), 7);
        let emojis: std::collections::HashSet<_> =
            SlotSymbol::ALL.iter().map(|s| s.emoji()).collect();
        assert_eq!(emojis.len(), 7);
    }

    #[test]
    fn test_outcome_payout_follows_multiplier() {
        let won = Outcome::settled(
            GameKind::NumberGuess,
            100,
            2,
            OutcomeDetail::NumberGuess { winning: 7, guess: 7 },
        );
        assert!(won.win);
        assert_eq!(won.payout, 200);

        let lost = Outcome::settled(
            GameKind::NumberGuess,
            100,
            0,
            OutcomeDetail::NumberGuess { winning: 7, guess: 3 },
        );
        assert!(!lost.win);
        assert_eq!(lost.payout, 0);
    }

    #[test]
    fn test_outcome_serializes_with_tagged_detail() {
        let outcome = Outcome::settled(
            GameKind::SlotMachine,
            300,
            10,
            OutcomeDetail::SlotMachine {
                reels: [SlotSymbol::Diamond; 3],
            },
        );
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["detail"], "slot_machine");
        assert_eq!(value["payout"], 3_000);
        assert_eq!(value["reels"][0], "diamond");
    }
}
