//! Resolver: turns a round's [`Partition`] into board mutations and score.
//!
//! Resolution of one round has two phases:
//!
//! 1. **Apply**: every group is removed from the board and replaced by one
//!    upgraded piece on its anchor. Groups are processed in creation order,
//!    so when an anchor was later reassigned to another group, that group's
//!    removal wins.
//! 2. **Gravity**: every column is compacted downward.
//!
//! # Scoring
//!
//! A group of `n` members at level `L` scores `(n - 2) * points(L)`, where
//! `points` is the rules' per-level table. Levels outside the table score 0,
//! which makes merging maxed pieces worthless. Groups reduced below three
//! members by merging score 0 but are still removed and upgraded.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::board::Board;
use crate::cell::Cell;
use crate::detector::{MergeGroup, Partition};
use crate::rules::Rules;

/// Result of applying one round's partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Number of merge-groups resolved
    pub groups: usize,
    /// Number of positions emptied
    pub removed: usize,
    /// Points earned
    pub score: u64,
}

/// Applies partitions to a board according to the rules.
///
/// # Example
///
/// ```
/// use cascade_core::board::{Board, Pos};
/// use cascade_core::cell::Cell;
/// use cascade_core::detector::MatchDetector;
/// use cascade_core::resolver::Resolver;
/// use cascade_core::rules::Rules;
///
/// let rules = Rules::default();
/// let mut board: Board = ". . .\nA1 A1 A1".parse().unwrap();
/// let partition = MatchDetector::new(&rules.scan_directions).detect(&board, false);
///
/// let outcome = Resolver::new(&rules).resolve(&mut board, &partition);
/// assert_eq!(outcome.removed, 3);
/// assert_eq!(outcome.score, 1);
/// assert_eq!(board.get(Pos::new(1, 1)), Some(&Cell::new("A", 2)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    rules: &'a Rules,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver for the given rules.
    #[must_use]
    pub fn new(rules: &'a Rules) -> Self {
        Self { rules }
    }

    /// Score of one group given the piece it is made of.
    #[must_use]
    pub fn group_score(&self, group: &MergeGroup, piece: &Cell) -> u64 {
        let extra = group.len().saturating_sub(2) as u64;
        extra * u64::from(self.rules.points_for_level(piece.level))
    }

    /// Removes every group and spawns its upgraded piece on the anchor.
    ///
    /// The piece of each group is read before anything on the board changes.
    pub fn apply(&self, board: &mut Board, partition: &Partition) -> RoundOutcome {
        let pieces: Vec<(&MergeGroup, Cell)> = partition
            .iter()
            .filter_map(|group| {
                let piece = group.members.iter().find_map(|&pos| board.get(pos))?;
                Some((group, piece.clone()))
            })
            .collect();

        let mut outcome = RoundOutcome::default();
        for (group, piece) in pieces {
            let score = self.group_score(group, &piece);
            trace!(
                id = group.id.as_u32(),
                size = group.len(),
                anchor = ?group.anchor,
                %piece,
                score,
                "resolving group"
            );

            for &pos in &group.members {
                board.take(pos);
            }
            board.set(group.anchor, Some(piece.upgraded(self.rules.max_level)));

            outcome.groups += 1;
            outcome.removed += group.len();
            outcome.score += score;
        }
        outcome
    }

    /// Compacts every column of the board downward.
    pub fn apply_gravity(&self, board: &mut Board) {
        board.apply_gravity();
    }

    /// Applies the partition, then gravity.
    pub fn resolve(&self, board: &mut Board, partition: &Partition) -> RoundOutcome {
        let outcome = self.apply(board, partition);
        self.apply_gravity(board);
        outcome
    }
}
