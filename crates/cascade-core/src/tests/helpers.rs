//! Board builders and shared assertions for the cross-module tests.

use crate::board::{Board, Pos};
use crate::detector::MatchDetector;
use crate::generate::BoardGenerator;
use crate::rules::Rules;

// =============================================================================
// Builders
// =============================================================================

/// Parses a board from its text form, panicking on malformed input.
pub fn board(text: &str) -> Board {
    text.parse()
        .unwrap_or_else(|err| panic!("bad test board {text:?}: {err}"))
}

/// Default rules sized to `board`.
pub fn rules_for(board: &Board) -> Rules {
    Rules::for_shape(board.shape())
}

/// The 3x3 board with an A1 diagonal one swap away.
pub fn scenario_board() -> Board {
    board("A1 A1 -\n- A1 A1\n- - B1")
}

/// A seeded 6x6 board from the default generator.
pub fn seeded_board(seed: u64) -> Board {
    BoardGenerator::default()
        .generate(seed)
        .expect("default generator settings are valid")
}

/// 1-based position, as players number the board.
pub fn at(row: usize, col: usize) -> Pos {
    Pos::from_one_based(row, col).expect("1-based coordinates start at 1")
}

// =============================================================================
// Assertions
// =============================================================================

/// Asserts that no scan direction finds a match on `board`.
pub fn assert_no_matches(board: &Board, rules: &Rules) {
    let partition = MatchDetector::new(&rules.scan_directions).detect(board, false);
    assert!(
        partition.is_empty(),
        "expected a fixed point, found {} group(s) on\n{board}",
        partition.len()
    );
}

/// Asserts that every column has its pieces packed at the bottom.
pub fn assert_compacted(board: &Board) {
    assert!(board.is_compacted(), "board is not compacted:\n{board}");
}
