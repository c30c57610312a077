//! Number-sequence puzzles.
//!
//! Every rule knows its first term and how to extend a prefix by one term.
//! The revealed terms and the hidden solution come from the same
//! [`SequenceRule::successor`] walk, so a puzzle can never disagree with
//! its own label.

use std::fmt;

use serde::Serialize;

use breakthrough_types::{DifficultyTier, MasteryScalar, RandomSource};

/// Terms shown to the player.
pub const REVEALED_TERMS: usize = 5;

const PRIME_SEEDS: [i64; 6] = [2, 3, 5, 7, 11, 13];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum SequenceRule {
    Arithmetic { start: i64, step: i64 },
    Geometric { start: i64, ratio: i64 },
    /// Differences grow by one each term: `+s, +(s+1), +(s+2)...`
    IncreasingStep { start: i64, first_step: i64 },
    /// Falls then rises: differences `-3k, -k, +k, +3k, +5k`.
    Valley { start: i64, k: i64 },
    Squares { root: i64 },
    Fibonacci { first: i64, second: i64 },
    /// Multiply by `mult`, then add `add`, then multiply again...
    Alternating { start: i64, mult: i64, add: i64 },
    Primes { start: i64 },
    Cubes { root: i64 },
}

impl SequenceRule {
    /// Draw a rule from the family belonging to `tier`.
    pub fn random<R: RandomSource + ?Sized>(tier: DifficultyTier, rng: &mut R) -> Self {
        match tier {
            DifficultyTier::Novice => SequenceRule::Arithmetic {
                start: rng.range_inclusive(1, 10),
                step: rng.range_inclusive(2, 9),
            },
            DifficultyTier::Adept => match rng.next_index(3) {
                0 => SequenceRule::Geometric {
                    start: rng.range_inclusive(1, 5),
                    ratio: rng.range_inclusive(2, 3),
                },
                1 => SequenceRule::IncreasingStep {
                    start: rng.range_inclusive(1, 10),
                    first_step: rng.range_inclusive(1, 4),
                },
                _ => SequenceRule::Valley {
                    start: rng.range_inclusive(10, 20),
                    k: rng.range_inclusive(2, 3),
                },
            },
            DifficultyTier::Master => match rng.next_index(5) {
                0 => SequenceRule::Squares {
                    root: rng.range_inclusive(2, 9),
                },
                1 => {
                    let first = rng.range_inclusive(1, 5);
                    SequenceRule::Fibonacci {
                        first,
                        second: first + rng.range_inclusive(0, 4),
                    }
                }
                2 => SequenceRule::Alternating {
                    start: rng.range_inclusive(1, 4),
                    mult: rng.range_inclusive(2, 3),
                    add: rng.range_inclusive(1, 5),
                },
                3 => SequenceRule::Primes {
                    start: PRIME_SEEDS[rng.next_index(PRIME_SEEDS.len())],
                },
                _ => SequenceRule::Cubes {
                    root: rng.range_inclusive(1, 5),
                },
            },
        }
    }

    #[must_use]
    pub const fn first(self) -> i64 {
        match self {
            SequenceRule::Arithmetic { start, .. }
            | SequenceRule::Geometric { start, .. }
            | SequenceRule::IncreasingStep { start, .. }
            | SequenceRule::Valley { start, .. }
            | SequenceRule::Alternating { start, .. }
            | SequenceRule::Primes { start } => start,
            SequenceRule::Squares { root } => root * root,
            SequenceRule::Fibonacci { first, .. } => first,
            SequenceRule::Cubes { root } => root * root * root,
        }
    }

    /// The term that follows `terms`. `terms` must be non-empty and must
    /// itself have been produced by this rule.
    #[must_use]
    pub fn successor(self, terms: &[i64]) -> i64 {
        let n = terms.len() as i64;
        let last = terms.last().copied().unwrap_or_else(|| self.first());
        match self {
            SequenceRule::Arithmetic { step, .. } => last + step,
            SequenceRule::Geometric { ratio, .. } => last * ratio,
            SequenceRule::IncreasingStep { first_step, .. } => last + first_step + (n - 1),
            SequenceRule::Valley { k, .. } => last + k * (2 * n - 5),
            SequenceRule::Squares { root } => (root + n) * (root + n),
            SequenceRule::Fibonacci { second, .. } => match terms {
                [_] => second,
                [.., a, b] => a + b,
                [] => self.first(),
            },
            SequenceRule::Alternating { mult, add, .. } => {
                if n % 2 == 1 {
                    last * mult
                } else {
                    last + add
                }
            }
            SequenceRule::Primes { .. } => next_prime(last),
            SequenceRule::Cubes { root } => (root + n) * (root + n) * (root + n),
        }
    }

    /// The first `len` terms.
    #[must_use]
    pub fn terms(self, len: usize) -> Vec<i64> {
        let mut terms = Vec::with_capacity(len);
        if len == 0 {
            return terms;
        }
        terms.push(self.first());
        while terms.len() < len {
            let next = self.successor(&terms);
            terms.push(next);
        }
        terms
    }

    /// Whether `revealed` followed by `solution` is exactly this rule's output.
    #[must_use]
    pub fn verify(self, revealed: &[i64], solution: i64) -> bool {
        let expected = self.terms(revealed.len() + 1);
        expected[..revealed.len()] == *revealed && expected[revealed.len()] == solution
    }

    /// Hint text shown after a wrong answer.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            SequenceRule::Arithmetic { step, .. } => format!("arithmetic, step {step}"),
            SequenceRule::Geometric { ratio, .. } => format!("geometric, ratio {ratio}"),
            SequenceRule::IncreasingStep { first_step, .. } => {
                format!("steps growing by one, starting at +{first_step}")
            }
            SequenceRule::Valley { k, .. } => format!("falls then rises, steps change by {}", 2 * k),
            SequenceRule::Squares { .. } => "perfect squares".to_string(),
            SequenceRule::Fibonacci { .. } => "sum of the previous two terms".to_string(),
            SequenceRule::Alternating { mult, add, .. } => {
                format!("alternating \u{d7}{mult} and +{add}")
            }
            SequenceRule::Primes { .. } => "consecutive primes".to_string(),
            SequenceRule::Cubes { .. } => "perfect cubes".to_string(),
        }
    }
}

impl fmt::Display for SequenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn is_prime(value: i64) -> bool {
    if value < 2 {
        return false;
    }
    let mut divisor = 2;
    while divisor * divisor <= value {
        if value % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}

fn next_prime(after: i64) -> i64 {
    let mut candidate = after.max(1) + 1;
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencePuzzle {
    revealed: Vec<i64>,
    solution: i64,
    rule: SequenceRule,
    mastery: MasteryScalar,
}

impl SequencePuzzle {
    pub fn generate<R: RandomSource + ?Sized>(mastery: MasteryScalar, rng: &mut R) -> Self {
        let rule = SequenceRule::random(DifficultyTier::from_mastery(mastery), rng);
        Self::from_rule(rule, mastery)
    }

    #[must_use]
    pub fn from_rule(rule: SequenceRule, mastery: MasteryScalar) -> Self {
        let mut revealed = rule.terms(REVEALED_TERMS + 1);
        let solution = revealed.pop().unwrap_or_default();
        Self {
            revealed,
            solution,
            rule,
            mastery,
        }
    }

    #[must_use]
    pub fn revealed(&self) -> &[i64] {
        &self.revealed
    }

    #[must_use]
    pub const fn solution(&self) -> i64 {
        self.solution
    }

    #[must_use]
    pub const fn rule(&self) -> SequenceRule {
        self.rule
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.rule.label()
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
    pub fn max_attempts(&self) -> u32 {
        match self.difficulty() {
            DifficultyTier::Novice => 5,
            DifficultyTier::Adept => 4,
            DifficultyTier::Master => 3,
        }
    }

    #[must_use]
    pub const fn is_correct(&self, answer: i64) -> bool {
        answer == self.solution
    }
}
