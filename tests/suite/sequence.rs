//! Sequence generator self-consistency.

use proptest::prelude::*;

use breakthrough_core::sequence::REVEALED_TERMS;
use breakthrough_core::{SeededRng, SequencePuzzle, SequenceRule};
use breakthrough_types::{DifficultyTier, MasteryScalar};

proptest! {
    #[test]
    fn generated_solution_is_the_rules_next_term(seed in any::<u64>(), mastery in 0.0f64..80.0) {
        let puzzle = SequencePuzzle::generate(MasteryScalar::new(mastery), &mut SeededRng::new(seed));
        let rule = puzzle.rule();

        prop_assert_eq!(puzzle.revealed().len(), REVEALED_TERMS);
        prop_assert!(rule.verify(puzzle.revealed(), puzzle.solution()));
        prop_assert_eq!(rule.successor(puzzle.revealed()), puzzle.solution());
        prop_assert!(!rule.verify(puzzle.revealed(), puzzle.solution() + 1));
        prop_assert!(puzzle.is_correct(puzzle.solution()));
    }

    #[test]
    fn rules_belong_to_their_band(seed in any::<u64>(), mastery in 0.0f64..80.0) {
        let mastery = MasteryScalar::new(mastery);
        let puzzle = SequencePuzzle::generate(mastery, &mut SeededRng::new(seed));
        let band_matches = match DifficultyTier::from_mastery(mastery) {
            DifficultyTier::Novice => matches!(puzzle.rule(), SequenceRule::Arithmetic { .. }),
            DifficultyTier::Adept => matches!(
                puzzle.rule(),
                SequenceRule::Geometric { .. }
                    | SequenceRule::IncreasingStep { .. }
                    | SequenceRule::Valley { .. }
            ),
            DifficultyTier::Master => matches!(
                puzzle.rule(),
                SequenceRule::Squares { .. }
                    | SequenceRule::Fibonacci { .. }
                    | SequenceRule::Alternating { .. }
                    | SequenceRule::Primes { .. }
                    | SequenceRule::Cubes { .. }
            ),
        };
        prop_assert!(band_matches, "{:?} for {:?}", puzzle.rule(), mastery);
    }
}

#[test]
fn arithmetic_example() {
    let puzzle = SequencePuzzle::from_rule(
        SequenceRule::Arithmetic { start: 3, step: 3 },
        MasteryScalar::new(0.0),
    );
    assert_eq!(puzzle.revealed(), &[3, 6, 9, 12, 15]);
    assert!(puzzle.is_correct(18));
    assert!(!puzzle.is_correct(17));
}

#[test]
fn attempts_shrink_with_mastery() {
    let attempts = |mastery: f64| {
        SequencePuzzle::generate(MasteryScalar::new(mastery), &mut SeededRng::new(1)).max_attempts()
    };
    assert_eq!(attempts(0.0), 5);
    assert_eq!(attempts(12.0), 4);
    assert_eq!(attempts(30.0), 3);
}

#[test]
fn same_seed_same_puzzle() {
    let a = SequencePuzzle::generate(MasteryScalar::new(20.0), &mut SeededRng::new(77));
    let b = SequencePuzzle::generate(MasteryScalar::new(20.0), &mut SeededRng::new(77));
    assert_eq!(a, b);
}
