//! Randomness sources for game resolution.
//!
//! Every draw in the casino goes through [`RandomSource`], injected at
//! wiring time. Production uses OS entropy; tests pin outcomes with a
//! seeded stream or an explicit script.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One authoritative source of uniform draws.
pub trait RandomSource: Send + Sync {
    /// Uniform draw from the inclusive range `[min, max]`.
    fn roll_range(&self, min: u64, max: u64) -> u64;
}

/// Thread-safe `StdRng` wrapper, the production source.
pub struct EntropyRng {
    inner: Mutex<StdRng>,
}

impl EntropyRng {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic stream for reproducible runs and regression tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for EntropyRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRng {
    fn roll_range(&self, min: u64, max: u64) -> u64 {
        debug_assert!(min <= max);
        let mut rng = self.inner.lock().unwrap();
        rng.gen_range(min..=max)
    }
}

/// Plays back a fixed queue of draws, in order.
///
/// Test-only by intent: it panics when asked for more values than it was
/// given, or when a scripted value falls outside the requested range, which
/// in a test is exactly the failure you want to see.
pub struct ScriptedRng {
    script: Mutex<VecDeque<u64>>,
}

impl ScriptedRng {
    pub fn new(values: &[u64]) -> Self {
        Self {
            script: Mutex::new(values.iter().copied().collect()),
        }
    }

    /// Queue more draws at the back of the script.
    pub fn push(&self, value: u64) {
        self.script.lock().unwrap().push_back(value);
    }

    /// Draws not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

impl RandomSource for ScriptedRng {
    fn roll_range(&self, min: u64, max: u64) -> u64 {
        let value = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted rng exhausted");
        assert!(
            value >= min && value <= max,
            "scripted value {} outside requested range [{}, {}]",
            value,
            min,
            max
        );
        value
    }
}
