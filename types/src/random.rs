//! Injectable randomness.
//!
//! Every generator, the tile spawn step, and the outcome roll draw through
//! this trait, so a seeded or scripted source replays a trial exactly.

pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    fn next_index(&mut self, bound: usize) -> usize;

    /// Uniform integer in `low..=high`.
    fn range_inclusive(&mut self, low: i64, high: i64) -> i64 {
        debug_assert!(low <= high, "empty range {low}..={high}");
        let span = usize::try_from(high.saturating_sub(low)).unwrap_or(0) + 1;
        low + self.next_index(span) as i64
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }

    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }

    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
    }
}
