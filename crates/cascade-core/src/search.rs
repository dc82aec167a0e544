//! Exhaustive best-swap search.
//!
//! The search enumerates every ordered pair of distinct positions in
//! row-major, then row-major nested, order. Pairs where both slots are empty
//! or both hold equivalent pieces are skipped; every other pair is a
//! candidate. Each candidate is simulated on its own
//! [`fresh_copy`](Board::fresh_copy) of the board, so evaluations share no
//! mutable state.
//!
//! # Selection
//!
//! The best candidate is the one with the highest score. On ties the
//! candidate enumerated *last* wins. If no candidate scores above zero the
//! outcome has no move and a score of 0.
//!
//! # Parallelism
//!
//! [`find_best_swap`] evaluates candidates on the rayon pool, then selects
//! the winner sequentially in enumeration order. The result is identical to
//! [`find_best_swap_sequential`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info_span, trace};

use crate::board::{Board, Pos};
use crate::cascade::{run_swap, CascadeReport};
use crate::cell::equivalent;
use crate::error::{Error, Result};
use crate::rules::Rules;

/// A swap of two board positions.
///
/// `Display` uses the 1-based `(row, col)` form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapMove {
    /// First position
    pub a: Pos,
    /// Second position
    pub b: Pos,
}

impl SwapMove {
    /// Creates a swap move.
    #[must_use]
    pub const fn new(a: Pos, b: Pos) -> Self {
        Self { a, b }
    }

    /// Returns both positions as 1-based `(row, col)` pairs.
    #[must_use]
    pub const fn one_based(self) -> ((usize, usize), (usize, usize)) {
        (self.a.one_based(), self.b.one_based())
    }

    /// The same swap with its positions exchanged.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::new(self.b, self.a)
    }
}

impl fmt::Display for SwapMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.a, self.b)
    }
}

/// Result of a best-swap search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Recommended swap, or `None` when no swap scores above zero
    pub best: Option<SwapMove>,
    /// Predicted score of the recommended swap (0 without one)
    pub score: u64,
    /// Cascade report of the recommended swap
    pub report: Option<CascadeReport>,
    /// Number of candidates simulated
    pub evaluated: usize,
    /// Number of ordered pairs skipped as empty/empty or equivalent
    pub skipped: usize,
}

/// Returns true if swapping `a` and `b` is worth simulating.
///
/// Both-empty swaps are meaningless and swapping equivalent pieces changes
/// nothing.
#[must_use]
pub fn is_candidate(board: &Board, a: Pos, b: Pos) -> bool {
    let (ca, cb) = (board.get(a), board.get(b));
    if ca.is_none() && cb.is_none() {
        return false;
    }
    !equivalent(ca, cb)
}

/// Enumerates the candidate swaps in search order.
pub fn candidates(board: &Board) -> impl Iterator<Item = SwapMove> + '_ {
    let shape = board.shape();
    shape
        .positions()
        .flat_map(move |a| shape.positions().map(move |b| SwapMove::new(a, b)))
        .filter(move |mv| mv.a != mv.b && is_candidate(board, mv.a, mv.b))
}

/// Simulates one swap on an independent copy of `board`.
///
/// # Panics
///
/// Panics if the positions are equal or out of range.
#[must_use]
pub fn evaluate(board: &Board, mv: SwapMove, rules: &Rules) -> CascadeReport {
    let mut copy = board.fresh_copy();
    run_swap(&mut copy, mv.a, mv.b, rules)
}

/// Checks a user-supplied swap, then simulates it on a copy.
///
/// Returns the board at the cascade's fixed point together with the report.
///
/// # Errors
///
/// Returns [`Error::InvalidSwap`] for out-of-range or identical positions and
/// propagates rules and shape validation errors.
pub fn simulate_swap(board: &Board, mv: SwapMove, rules: &Rules) -> Result<(Board, CascadeReport)> {
    rules.validate()?;
    rules.check_board(board)?;
    let shape = board.shape();
    if mv.a == mv.b || !shape.contains(mv.a) || !shape.contains(mv.b) {
        return Err(Error::InvalidSwap {
            a: mv.a,
            b: mv.b,
            shape,
        });
    }

    let mut copy = board.fresh_copy();
    let report = run_swap(&mut copy, mv.a, mv.b, rules);
    Ok((copy, report))
}

/// Finds the best swap, evaluating candidates in parallel.
///
/// # Errors
///
/// Returns an error if the rules are invalid or the board does not have the
/// configured shape.
///
/// # Example
///
/// ```
/// use cascade_core::board::{Board, GridShape, Pos};
/// use cascade_core::rules::Rules;
/// use cascade_core::search::find_best_swap;
///
/// let board: Board = "A1 A1 .\n. A1 A1\n. . B1".parse().unwrap();
/// let rules = Rules::for_shape(board.shape());
///
/// let outcome = find_best_swap(&board, &rules).unwrap();
/// assert!(outcome.best.is_some());
/// assert!(outcome.score > 0);
/// ```
pub fn find_best_swap(board: &Board, rules: &Rules) -> Result<SearchOutcome> {
    rules.validate()?;
    rules.check_board(board)?;
    let _span = info_span!("find_best_swap", shape = %board.shape()).entered();

    let moves: Vec<SwapMove> = candidates(board).collect();
    let scored: Vec<(SwapMove, CascadeReport)> = moves
        .par_iter()
        .map(|&mv| (mv, evaluate(board, mv, rules)))
        .collect();

    Ok(select_best(board, scored))
}

/// Finds the best swap on the calling thread.
///
/// # Errors
///
/// Same as [`find_best_swap`].
pub fn find_best_swap_sequential(board: &Board, rules: &Rules) -> Result<SearchOutcome> {
    rules.validate()?;
    rules.check_board(board)?;
    let _span = info_span!("find_best_swap_sequential", shape = %board.shape()).entered();

    let scored = candidates(board).map(|mv| (mv, evaluate(board, mv, rules)));
    Ok(select_best(board, scored))
}

/// Picks the winner from candidates in enumeration order.
fn select_best(
    board: &Board,
    scored: impl IntoIterator<Item = (SwapMove, CascadeReport)>,
) -> SearchOutcome {
    let mut best: Option<(SwapMove, CascadeReport)> = None;
    let mut max_score = 0;
    let mut evaluated = 0;

    for (mv, report) in scored {
        evaluated += 1;
        trace!(%mv, score = report.score, rounds = report.rounds(), "candidate evaluated");
        if report.score >= max_score {
            max_score = report.score;
            best = Some((mv, report));
        }
    }

    let total_pairs = board.shape().len() * board.shape().len().saturating_sub(1);
    let mut outcome = SearchOutcome {
        evaluated,
        skipped: total_pairs - evaluated,
        ..SearchOutcome::default()
    };
    if let Some((mv, report)) = best.filter(|(_, report)| report.score > 0) {
        outcome.best = Some(mv);
        outcome.score = report.score;
        outcome.report = Some(report);
    }

    debug!(
        evaluated = outcome.evaluated,
        skipped = outcome.skipped,
        best = ?outcome.best,
        score = outcome.score,
        "search finished"
    );
    outcome
}
