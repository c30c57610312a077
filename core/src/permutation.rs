//! Trigram ordering puzzles.

use serde::Serialize;

use breakthrough_types::{DifficultyTier, Glyph, MasteryScalar, RandomSource};

use crate::errors::PuzzleError;

pub const MIN_LEN: usize = 4;
pub const MAX_LEN: usize = Glyph::ALPHABET.len();
const MIN_STEPS: u32 = 3;

/// Result of a single click on the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// First click: position remembered.
    Marked(usize),
    /// Same position clicked twice.
    Cleared,
    /// Second click: the two positions were exchanged.
    Swapped(usize, usize),
}

/// Restore `current` to `target` with pairwise swaps.
///
/// `current` is always a rearrangement of `target`. Reversing `scramble`
/// from the end solves the puzzle in `scramble.len()` swaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermutationPuzzle {
    target: Vec<Glyph>,
    current: Vec<Glyph>,
    scramble: Vec<(usize, usize)>,
    max_steps: u32,
    #[serde(skip)]
    selection: Option<usize>,
    mastery: MasteryScalar,
}

impl PermutationPuzzle {
    pub fn generate<R: RandomSource + ?Sized>(mastery: MasteryScalar, rng: &mut R) -> Self {
        let len = sequence_len(mastery);
        let target = draw_glyphs(len, rng);
        let mut current = target.clone();
        let mut scramble = Vec::new();

        for _ in 0..swap_count(mastery, len) {
            let pair = distinct_pair(len, rng);
            current.swap(pair.0, pair.1);
            scramble.push(pair);
        }
        // An even number of swaps can cancel out.
        if current == target {
            let pair = distinct_pair(len, rng);
            current.swap(pair.0, pair.1);
            scramble.push(pair);
        }

        let slack = match DifficultyTier::from_mastery(mastery) {
            DifficultyTier::Novice => 3,
            DifficultyTier::Adept => 2,
            DifficultyTier::Master => 1,
        };
        let max_steps = (scramble.len() as u32 + slack).max(MIN_STEPS);

        Self {
            target,
            current,
            scramble,
            max_steps,
            selection: None,
            mastery,
        }
    }

    #[must_use]
    pub fn target(&self) -> &[Glyph] {
        &self.target
    }

    #[must_use]
    pub fn current(&self) -> &[Glyph] {
        &self.current
    }

    /// Swaps applied to the target during generation, in order.
    #[must_use]
    pub fn scramble(&self) -> &[(usize, usize)] {
        &self.scramble
    }

    #[must_use]
    pub const fn selection(&self) -> Option<usize> {
        self.selection
    }

    #[must_use]
    pub const fn max_steps(&self) -> u32 {
        self.max_steps
    }

    #[must_use]
    pub const fn mastery(&self) -> MasteryScalar {
        self.mastery
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyTier {
        DifficultyTier::from_mastery(self.mastery)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.current == self.target
    }

    /// Two-click selection. The second click on a different position swaps.
    pub fn select(&mut self, position: usize) -> Result<Selection, PuzzleError> {
        self.check(position)?;
        match self.selection.take() {
            None => {
                self.selection = Some(position);
                Ok(Selection::Marked(position))
            }
            Some(marked) if marked == position => Ok(Selection::Cleared),
            Some(marked) => {
                self.current.swap(marked, position);
                Ok(Selection::Swapped(marked, position))
            }
        }
    }

    /// Exchange two positions directly. Returns whether the row changed.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<bool, PuzzleError> {
        self.check(a)?;
        self.check(b)?;
        self.selection = None;
        if a == b {
            return Ok(false);
        }
        self.current.swap(a, b);
        Ok(true)
    }

    fn check(&self, position: usize) -> Result<(), PuzzleError> {
        if position < self.current.len() {
            Ok(())
        } else {
            Err(PuzzleError::PositionOutOfRange {
                position,
                len: self.current.len(),
            })
        }
    }
}

fn sequence_len(mastery: MasteryScalar) -> usize {
    let extra = (mastery.value() / 10.0).floor() as usize;
    MIN_LEN.saturating_add(extra).min(MAX_LEN)
}

fn swap_count(mastery: MasteryScalar, len: usize) -> usize {
    let scaled = (mastery.value() / 5.0).floor() as usize;
    scaled.min(2 * len).max(1)
}

/// Partial Fisher-Yates over the trigram alphabet.
fn draw_glyphs<R: RandomSource + ?Sized>(len: usize, rng: &mut R) -> Vec<Glyph> {
    let mut pool = Glyph::ALPHABET.to_vec();
    for i in 0..len {
        let j = i + rng.next_index(pool.len() - i);
        pool.swap(i, j);
    }
    pool.truncate(len);
    pool
}

fn distinct_pair<R: RandomSource + ?Sized>(len: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.next_index(len);
    let mut b = rng.next_index(len - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}
