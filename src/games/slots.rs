//! Slot machine: three independent reels over seven symbols.
//!
//! Payout rules, first match wins top to bottom: triple 💎 pays 10x,
//! triple 7️⃣ pays 5x, any other triple 3x, a pair adjacent to the middle
//! reel 2x. Matching outer reels around a different middle reel pay
//! nothing; only adjacency to the middle reel counts.

use crate::games::types::{GameKind, Outcome, OutcomeDetail, SlotSymbol};
use crate::rng::RandomSource;

pub const DIAMOND_TRIPLE_MULTIPLIER: u64 = 10;
pub const SEVEN_TRIPLE_MULTIPLIER: u64 = 5;
pub const TRIPLE_MULTIPLIER: u64 = 3;
pub const PAIR_MULTIPLIER: u64 = 2;

/// Spin all three reels.
pub fn spin(rng: &dyn RandomSource) -> [SlotSymbol; 3] {
    let mut reels = [SlotSymbol::Cherry; 3];
    for reel in reels.iter_mut() {
        let index = rng.roll_range(0, (SlotSymbol::ALL.len() - 1) as u64) as usize;
        *reel = SlotSymbol::ALL[index];
    }
    reels
}

/// Multiplier for a reel line, evaluated top to bottom.
pub fn line_multiplier(reels: [SlotSymbol; 3]) -> u64 {
    let [r0, r1, r2] = reels;
    if r0 == r1 && r1 == r2 {
        return match r0 {
            SlotSymbol::Diamond => DIAMOND_TRIPLE_MULTIPLIER,
            SlotSymbol::Seven => SEVEN_TRIPLE_MULTIPLIER,
            _ => TRIPLE_MULTIPLIER,
        };
    }
    // Only pairs touching the middle reel pay; r0 == r2 alone does not.
    if r0 == r1 || r1 == r2 {
        return PAIR_MULTIPLIER;
    }
    0
}

/// Spin and settle against the stake.
pub fn play(rng: &dyn RandomSource, stake: u64) -> Outcome {
    let reels = spin(rng);
    let multiplier = line_multiplier(reels);
    Outcome::settled(
        GameKind::SlotMachine,
        stake,
        multiplier,
        OutcomeDetail::SlotMachine { reels },
    )
}
