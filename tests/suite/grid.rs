//! Grid-merge simulator properties.

use proptest::prelude::*;

use breakthrough_core::grid::GRID_SIZE;
use breakthrough_core::{GridState, SeededRng, merge_line};
use breakthrough_types::Direction;

use crate::common::{arb_full_grid, arb_grid};

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

/// Score gained by merging every line by hand, independent of the board's
/// own direction mapping.
fn reference_delta(grid: &GridState, direction: Direction) -> u64 {
    let cells = grid.cells();
    (0..GRID_SIZE)
        .map(|i| {
            let mut line = match direction {
                Direction::Left | Direction::Right => cells[i],
                Direction::Up | Direction::Down => [cells[0][i], cells[1][i], cells[2][i], cells[3][i]],
            };
            if matches!(direction, Direction::Right | Direction::Down) {
                line.reverse();
            }
            merge_line(line).1
        })
        .sum()
}

proptest! {
    #[test]
    fn slide_conserves_tile_sum(grid in arb_grid(), direction in arb_direction()) {
        let slid = grid.slide(direction);
        prop_assert_eq!(slid.grid.tile_sum(), grid.tile_sum());
        prop_assert!(slid.grid.tile_count() <= grid.tile_count());
    }

    #[test]
    fn a_real_move_adds_exactly_one_tile(
        grid in arb_grid(),
        direction in arb_direction(),
        seed in any::<u64>(),
    ) {
        let slid = grid.slide(direction);
        let mut board = grid.clone();
        let outcome = board.apply_move(direction, &mut SeededRng::new(seed));

        prop_assert_eq!(outcome.moved, slid.moved);
        if outcome.moved {
            let spawn = outcome.spawned.expect("a moving slide leaves an empty cell");
            prop_assert!(spawn.value == 2 || spawn.value == 4);
            prop_assert_eq!(board.tile_count(), slid.grid.tile_count() + 1);
            prop_assert_eq!(board.cells()[spawn.row][spawn.col], spawn.value);
        } else {
            prop_assert_eq!(outcome.spawned, None);
            prop_assert_eq!(board, grid);
        }
    }

    #[test]
    fn score_delta_matches_reference_merge(
        grid in arb_grid(),
        direction in arb_direction(),
        start in 0u64..5000,
    ) {
        let grid = grid.with_score(start);
        let slid = grid.slide(direction);
        prop_assert_eq!(slid.score_delta, reference_delta(&grid, direction));
        prop_assert_eq!(slid.grid.score(), start + slid.score_delta);
    }

    #[test]
    fn directions_are_mirror_images(grid in arb_grid()) {
        let right = grid.slide(Direction::Right);
        let via_left = grid.mirrored().slide(Direction::Left);
        prop_assert_eq!(&right.grid, &via_left.grid.mirrored());
        prop_assert_eq!(right.score_delta, via_left.score_delta);

        let down = grid.slide(Direction::Down);
        let via_up = grid.flipped().slide(Direction::Up);
        prop_assert_eq!(&down.grid, &via_up.grid.flipped());
        prop_assert_eq!(down.score_delta, via_up.score_delta);
    }

    #[test]
    fn game_over_iff_nothing_moves(grid in arb_full_grid()) {
        let stuck = Direction::ALL.iter().all(|&d| !grid.slide(d).moved);
        prop_assert_eq!(grid.is_game_over(), stuck);
    }

    #[test]
    fn boards_with_space_are_never_over(grid in arb_grid()) {
        if !grid.empty_cells().is_empty() {
            prop_assert!(!grid.is_game_over());
        }
    }
}

#[test]
fn new_game_deals_two_small_tiles() {
    for seed in 0..50 {
        let grid = GridState::new_game(&mut SeededRng::new(seed));
        assert_eq!(grid.tile_count(), 2);
        assert_eq!(grid.score(), 0);
        assert!(grid.cells().iter().flatten().all(|&v| matches!(v, 0 | 2 | 4)));
    }
}

#[test]
fn each_pair_merges_once_per_move() {
    let grid = GridState::from_cells([[2, 2, 2, 2], [4, 4, 8, 0], [2, 0, 0, 2], [8, 8, 8, 0]]);
    let slid = grid.slide(Direction::Left);
    assert_eq!(
        slid.grid.cells(),
        &[[4, 4, 0, 0], [8, 8, 0, 0], [4, 0, 0, 0], [16, 8, 0, 0]]
    );
    assert_eq!(slid.score_delta, 8 + 8 + 4 + 16);
}

#[test]
fn blocked_direction_is_a_no_op() {
    let grid = GridState::from_cells([[2, 4, 0, 0], [8, 0, 0, 0], [0; 4], [0; 4]]).with_score(7);
    let mut board = grid.clone();
    let outcome = board.apply_move(Direction::Left, &mut SeededRng::new(3));
    assert!(!outcome.moved);
    assert_eq!(board, grid);
}
