//! Number guess: the house draws a winning number and the player's guess.
//!
//! Both values come off the same randomness source, winning number first.
//! The player never picks; the guess itself is a draw. A match pays 2x.

use crate::games::types::{GameKind, Outcome, OutcomeDetail};
use crate::rng::RandomSource;

pub const NUMBER_MIN: u64 = 1;
pub const NUMBER_MAX: u64 = 10;
pub const MATCH_MULTIPLIER: u64 = 2;

/// Draw one round and settle it against the stake.
pub fn play(rng: &dyn RandomSource, stake: u64) -> Outcome {
    let winning = rng.roll_range(NUMBER_MIN, NUMBER_MAX) as u8;
    let guess = rng.roll_range(NUMBER_MIN, NUMBER_MAX) as u8;
    let multiplier = if guess == winning { MATCH_MULTIPLIER } else { 0 };
    Outcome::settled(
        GameKind::NumberGuess,
        stake,
        multiplier,
        OutcomeDetail::NumberGuess { winning, guess },
    )
}
