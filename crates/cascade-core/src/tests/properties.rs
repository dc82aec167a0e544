//! Property-based tests over randomly generated boards.

use proptest::prelude::*;

use crate::board::{Board, GridShape, Pos};
use crate::cascade::run_swap;
use crate::cell::{equivalent, Cell};
use crate::detector::MatchDetector;
use crate::rules::{Direction, Rules};
use crate::search::{candidates, evaluate, find_best_swap, find_best_swap_sequential, SwapMove};

use super::helpers::assert_no_matches;

const FAMILIES: [&str; 3] = ["A", "B", "C"];

/// Strategy: one slot, empty about a fifth of the time.
fn slot_strategy() -> impl Strategy<Value = Option<Cell>> {
    prop::option::weighted(0.8, (0..FAMILIES.len(), 1..=3u8))
        .prop_map(|slot| slot.map(|(family, level)| Cell::new(FAMILIES[family], level)))
}

/// Strategy: a board of up to 4x4 slots, not necessarily compacted.
fn board_strategy() -> impl Strategy<Value = Board> {
    (1..=4usize, 1..=4usize).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(slot_strategy(), cols), rows)
            .prop_map(|rows| Board::from_rows(rows).unwrap())
    })
}

/// Strategy: a board with at least two slots and a valid swap on it.
fn board_and_swap_strategy() -> impl Strategy<Value = (Board, SwapMove)> {
    board_strategy()
        .prop_filter("need two slots to swap", |b| b.shape().len() >= 2)
        .prop_flat_map(|board| {
            let shape = board.shape();
            let n = shape.len();
            (Just(board), 0..n, 1..n).prop_map(move |(board, i, step)| {
                let a = nth(shape, i);
                let b = nth(shape, (i + step) % n);
                (board, SwapMove::new(a, b))
            })
        })
}

fn nth(shape: GridShape, index: usize) -> Pos {
    Pos::new(index / shape.cols, index % shape.cols)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Gravity compacts every column and a second pass changes nothing.
    #[test]
    fn gravity_is_idempotent(board in board_strategy()) {
        let mut once = board.clone();
        once.apply_gravity();
        prop_assert!(once.is_compacted());
        prop_assert_eq!(once.occupied(), board.occupied());

        let mut twice = once.clone();
        twice.apply_gravity();
        prop_assert_eq!(twice, once);
    }

    // Groups are disjoint, cover every minimal match, and hold one kind of piece.
    #[test]
    fn partition_is_sound(board in board_strategy()) {
        let partition = MatchDetector::new(&Direction::CANONICAL).detect(&board, false);

        let mut seen = Vec::new();
        for group in &partition {
            prop_assert!(!group.is_empty());
            let first = board.get(group.members[0]);
            for &pos in &group.members {
                prop_assert!(!seen.contains(&pos), "{pos:?} is in two groups");
                prop_assert!(equivalent(first, board.get(pos)));
                seen.push(pos);
            }
        }

        let shape = board.shape();
        for pos in shape.positions() {
            for dir in Direction::CANONICAL {
                let n1 = shape.step(pos, dir.d_row, dir.d_col, 1);
                let n2 = shape.step(pos, dir.d_row, dir.d_col, 2);
                if let (Some(n1), Some(n2)) = (n1, n2) {
                    let cell = board.get(pos);
                    if cell.is_some() && equivalent(cell, board.get(n1)) && equivalent(cell, board.get(n2)) {
                        for p in [pos, n1, n2] {
                            prop_assert!(partition.group_of(p).is_some(), "{p:?} matched but ungrouped");
                        }
                    }
                }
            }
        }
    }

    // Every cascade ends at a fixed point; a cascade with rounds ends compacted.
    #[test]
    fn cascade_reaches_fixed_point((board, mv) in board_and_swap_strategy()) {
        let rules = Rules::for_shape(board.shape());
        let mut end = board.fresh_copy();
        let report = run_swap(&mut end, mv.a, mv.b, &rules);

        assert_no_matches(&end, &rules);
        prop_assert!(end.swap_points().is_none());
        prop_assert_eq!(report.score, report.round_outcomes.iter().map(|r| r.score).sum::<u64>());
        if report.rounds() > 0 {
            prop_assert!(end.is_compacted());
            prop_assert!(end.occupied() < board.occupied());
        } else {
            let mut swapped = board.fresh_copy();
            swapped.swap(mv.a, mv.b);
            swapped.clear_swap_points();
            prop_assert_eq!(end, swapped);
        }
    }

    // Swapping (a, b) and (b, a) yields the same cascade.
    #[test]
    fn swap_is_symmetric((board, mv) in board_and_swap_strategy()) {
        let rules = Rules::for_shape(board.shape());
        prop_assert_eq!(evaluate(&board, mv, &rules), evaluate(&board, mv.reversed(), &rules));
    }

    // The recommended swap scores at least as well as every candidate.
    #[test]
    fn best_swap_dominates(board in board_strategy()) {
        let rules = Rules::for_shape(board.shape());
        let outcome = find_best_swap(&board, &rules).unwrap();
        let top = candidates(&board)
            .map(|mv| evaluate(&board, mv, &rules).score)
            .max()
            .unwrap_or(0);

        prop_assert_eq!(outcome.score, top);
        prop_assert_eq!(outcome.best.is_some(), top > 0);
        prop_assert_eq!(outcome, find_best_swap_sequential(&board, &rules).unwrap());
    }

    // Text and JSON forms parse back to the same board.
    #[test]
    fn board_formats_round_trip(board in board_strategy()) {
        let text: Board = board.to_string().parse().unwrap();
        prop_assert_eq!(&text, &board);

        let json = serde_json::to_string(&board).unwrap();
        let parsed: Board = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, board);
    }
}
