//! Seeded random source backed by `rand`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use breakthrough_types::RandomSource;

/// Replayable random source. Two instances built from the same seed produce
/// identical puzzles, spawns, and rolls.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    inner: StdRng,
}

impl SeededRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the thread-local generator. The chosen seed is still
    /// recorded so a surprising trial can be replayed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    fn next_index(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "next_index requires a non-empty range");
        if bound <= 1 {
            return 0;
        }
        self.inner.random_range(0..bound)
    }
}
