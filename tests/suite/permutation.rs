//! Permutation puzzle solvability.

use std::collections::HashSet;

use proptest::prelude::*;

use breakthrough_core::{PermutationPuzzle, SeededRng, Selection};
use breakthrough_types::MasteryScalar;

fn generate(seed: u64, mastery: f64) -> PermutationPuzzle {
    PermutationPuzzle::generate(MasteryScalar::new(mastery), &mut SeededRng::new(seed))
}

proptest! {
    #[test]
    fn starts_scrambled_and_distinct(seed in any::<u64>(), mastery in 0.0f64..100.0) {
        let puzzle = generate(seed, mastery);
        prop_assert!(!puzzle.is_solved());
        let glyphs: HashSet<_> = puzzle.target().iter().collect();
        prop_assert_eq!(glyphs.len(), puzzle.len());

        let mut current = puzzle.current().to_vec();
        let mut target = puzzle.target().to_vec();
        current.sort_by_key(|g| g.name());
        target.sort_by_key(|g| g.name());
        prop_assert_eq!(current, target);
    }

    #[test]
    fn undoing_the_scramble_fits_the_budget(seed in any::<u64>(), mastery in 0.0f64..100.0) {
        let mut puzzle = generate(seed, mastery);
        let scramble = puzzle.scramble().to_vec();
        prop_assert!(scramble.len() < puzzle.max_steps() as usize);

        for &(a, b) in scramble.iter().rev() {
            prop_assert!(puzzle.swap(a, b).unwrap());
        }
        prop_assert!(puzzle.is_solved());
    }
}

#[test]
fn two_clicks_swap() {
    let mut puzzle = generate(5, 0.0);
    let before = puzzle.current().to_vec();

    assert_eq!(puzzle.select(0).unwrap(), Selection::Marked(0));
    assert_eq!(puzzle.selection(), Some(0));
    assert_eq!(puzzle.select(2).unwrap(), Selection::Swapped(0, 2));
    assert_eq!(puzzle.selection(), None);
    assert_eq!(puzzle.current()[0], before[2]);
    assert_eq!(puzzle.current()[2], before[0]);
}

#[test]
fn out_of_range_positions_are_errors() {
    let mut puzzle = generate(5, 0.0);
    assert!(puzzle.select(puzzle.len()).is_err());
    assert!(puzzle.swap(0, 99).is_err());
}
