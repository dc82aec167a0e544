//! Cascade module: the swap-triggered detect/resolve/gravity loop.
//!
//! A cascade starts with one user-level swap and then runs rounds until the
//! board reaches a fixed point:
//!
//! 1. **DETECT**: scan the board with a fresh scratch map. Round 0 enables
//!    the swap-point anchor override.
//! 2. **CHECK**: an empty partition ends the cascade.
//! 3. **APPLY**: remove groups, spawn upgraded pieces.
//! 4. **GRAVITY**: compact columns, advance the round counter.
//!
//! Every round strictly reduces the number of pieces on the board, so the
//! loop always terminates. A cascade is atomic from the caller's point of
//! view: [`run_swap`] only returns once the fixed point is reached.
//!
//! # Example
//!
//! ```
//! use cascade_core::board::{Board, Pos};
//! use cascade_core::cascade::run_swap;
//! use cascade_core::rules::Rules;
//!
//! let rules = Rules::default();
//! let mut board: Board = "A1 A1 .\n. A1 A1\n. . B1".parse().unwrap();
//!
//! let report = run_swap(&mut board, Pos::new(2, 2), Pos::new(1, 2), &rules);
//!
//! assert!(report.score > 0);
//! assert_eq!(report.rounds(), 1);
//! assert_eq!(board.to_string(), ". . .\n. . B1\n. A1 A2");
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, Pos};
use crate::detector::MatchDetector;
use crate::resolver::{Resolver, RoundOutcome};
use crate::rules::Rules;

/// Summary of a whole cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    /// Total points over all rounds
    pub score: u64,
    /// Total pieces removed over all rounds
    pub removed: usize,
    /// Per-round breakdown, in order
    pub round_outcomes: Vec<RoundOutcome>,
}

impl CascadeReport {
    /// Number of rounds that found matches.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.round_outcomes.len()
    }

    fn record(&mut self, outcome: RoundOutcome) {
        self.score += outcome.score;
        self.removed += outcome.removed;
        self.round_outcomes.push(outcome);
    }
}

/// An in-progress cascade on a borrowed board.
///
/// Most callers want [`run_swap`]; stepping manually is useful to inspect the
/// board between rounds.
#[derive(Debug)]
pub struct Cascade<'a> {
    board: &'a mut Board,
    rules: &'a Rules,
    round: usize,
    finished: bool,
    report: CascadeReport,
}

impl<'a> Cascade<'a> {
    /// Swaps `a` and `b` on the board and prepares the first round.
    ///
    /// # Panics
    ///
    /// Panics if the positions are equal or out of range (see
    /// [`Board::swap`]).
    pub fn start(board: &'a mut Board, rules: &'a Rules, a: Pos, b: Pos) -> Self {
        board.swap(a, b);
        Self {
            board,
            rules,
            round: 0,
            finished: false,
            report: CascadeReport::default(),
        }
    }

    /// Index of the next round to run.
    #[must_use]
    pub fn round(&self) -> usize {
        self.round
    }

    /// Returns true once a round found no matches.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Read-only view of the board between rounds.
    #[must_use]
    pub fn board(&self) -> &Board {
        &*self.board
    }

    /// Runs one round. Returns `None` once the board has no matches left.
    pub fn step(&mut self) -> Option<RoundOutcome> {
        if self.finished {
            return None;
        }

        let detector = MatchDetector::new(&self.rules.scan_directions);
        let partition = detector.detect(&*self.board, self.round == 0);
        if partition.is_empty() {
            self.finished = true;
            self.board.clear_swap_points();
            return None;
        }

        let outcome = Resolver::new(self.rules).resolve(self.board, &partition);
        debug!(
            round = self.round,
            groups = outcome.groups,
            removed = outcome.removed,
            score = outcome.score,
            "cascade round resolved"
        );

        self.report.record(outcome);
        self.round += 1;
        Some(outcome)
    }

    /// Runs the remaining rounds and returns the report.
    #[must_use]
    pub fn run(mut self) -> CascadeReport {
        while self.step().is_some() {}
        self.report
    }
}

/// Swaps `a` and `b`, runs the cascade to completion and returns its report.
///
/// The board is left at the cascade's fixed point with its swap points
/// cleared.
///
/// # Panics
///
/// Panics if the positions are equal or out of range.
pub fn run_swap(board: &mut Board, a: Pos, b: Pos, rules: &Rules) -> CascadeReport {
    Cascade::start(board, rules, a, b).run()
}
