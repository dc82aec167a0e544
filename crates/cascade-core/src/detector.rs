//! Match detection for one resolution round.
//!
//! The [`MatchDetector`] scans the board once and groups every matched
//! position into merge-groups. A *minimal match* is a straight or diagonal
//! run of three equivalent cells, found by looking one and two steps from an
//! occupied cell along each configured scan direction. Overlapping runs share
//! cells, and those runs are folded into a single group, so L, T and plus
//! shapes resolve as one combo.
//!
//! # Merge rules
//!
//! Each minimal match `{origin, n1, n2}` is merged into the round's groups as
//! soon as it is found:
//!
//! 1. No position tagged yet: a new group is created with its anchor on `n1`.
//! 2. Exactly one group among the three: the untagged positions join it.
//! 3. Two or more groups: the triple moves into the group of the
//!    Manhattan-nearest tagged neighbour (`n1` before `n2` on ties). Only the
//!    triple's own positions change groups; the rest of the losing group stays
//!    where it is.
//! 4. In the first round of a cascade, if the triple touches a swap point the
//!    group's anchor moves onto that swap point.
//!
//! Group tags live in a scratch map owned by a single [`MatchDetector::detect`]
//! call, so nothing leaks between rounds or between boards.

use std::fmt;

use tracing::trace;

use crate::board::{Board, Pos};
use crate::cell::equivalent;
use crate::rules::Direction;

/// Identifier of a merge-group within one detection pass.
///
/// Ids are allocated in discovery order starting at 0 and mean nothing
/// outside the pass that produced them.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(u32);

impl GroupId {
    /// Returns the raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

/// Positions resolved together as one combo, sharing one anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeGroup {
    /// Id within the detection pass
    pub id: GroupId,
    /// Member positions in the order they joined
    pub members: Vec<Pos>,
    /// Where the upgraded piece spawns
    pub anchor: Pos,
}

impl MergeGroup {
    /// Number of member positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if `pos` is a member.
    #[must_use]
    pub fn contains(&self, pos: Pos) -> bool {
        self.members.contains(&pos)
    }
}

/// The merge-groups found in one round, in creation order.
///
/// Groups are disjoint and never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    groups: Vec<MergeGroup>,
}

impl Partition {
    /// Returns true if the round found no matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// The groups in creation order.
    #[must_use]
    pub fn groups(&self) -> &[MergeGroup] {
        &self.groups
    }

    /// Iterates the groups in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, MergeGroup> {
        self.groups.iter()
    }

    /// Total number of matched positions across all groups.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.groups.iter().map(MergeGroup::len).sum()
    }

    /// Returns the group containing `pos`, if any.
    #[must_use]
    pub fn group_of(&self, pos: Pos) -> Option<&MergeGroup> {
        self.groups.iter().find(|g| g.contains(pos))
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a MergeGroup;
    type IntoIter = std::slice::Iter<'a, MergeGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Per-pass scratch state: group tag per position plus the groups so far.
struct RoundScratch {
    cols: usize,
    tags: Vec<Option<GroupId>>,
    members: Vec<Vec<Pos>>,
    anchors: Vec<Pos>,
}

impl RoundScratch {
    fn new(board: &Board) -> Self {
        Self {
            cols: board.cols(),
            tags: vec![None; board.shape().len()],
            members: Vec::new(),
            anchors: Vec::new(),
        }
    }

    fn tag(&self, pos: Pos) -> Option<GroupId> {
        self.tags[pos.row * self.cols + pos.col]
    }

    /// Tags `pos` with `id`, moving it out of any other group first.
    fn assign(&mut self, pos: Pos, id: GroupId) {
        let slot = pos.row * self.cols + pos.col;
        match self.tags[slot] {
            Some(current) if current == id => return,
            Some(old) => self.members[old.index()].retain(|&p| p != pos),
            None => {}
        }
        self.tags[slot] = Some(id);
        self.members[id.index()].push(pos);
    }

    fn create(&mut self, anchor: Pos) -> GroupId {
        let id = GroupId(u32::try_from(self.members.len()).unwrap_or(u32::MAX));
        self.members.push(Vec::new());
        self.anchors.push(anchor);
        id
    }

    /// Folds one minimal match into the groups and returns the group that
    /// now holds it.
    fn merge(&mut self, triple: [Pos; 3]) -> GroupId {
        let [origin, n1, n2] = triple;
        let tags = triple.map(|p| self.tag(p));

        let mut distinct: Vec<GroupId> = tags.iter().flatten().copied().collect();
        distinct.sort_unstable();
        distinct.dedup();

        let target = match distinct.as_slice() {
            [] => self.create(n1),
            [only] => *only,
            _ => {
                // At most one of the distinct tags sits on the origin, so at
                // least one neighbour is tagged.
                let nearest = [n1, n2]
                    .into_iter()
                    .filter_map(|p| self.tag(p).map(|id| (p, id)))
                    .min_by_key(|(p, _)| p.manhattan(origin))
                    .map(|(_, id)| id);
                let target = nearest.unwrap_or(distinct[0]);
                trace!(?origin, ?distinct, ?target, "merging groups");
                target
            }
        };

        for pos in triple {
            self.assign(pos, target);
        }
        target
    }

    fn into_partition(self) -> Partition {
        let groups = self
            .members
            .into_iter()
            .zip(self.anchors)
            .enumerate()
            .filter(|(_, (members, _))| !members.is_empty())
            .map(|(idx, (members, anchor))| MergeGroup {
                id: GroupId(u32::try_from(idx).unwrap_or(u32::MAX)),
                members,
                anchor,
            })
            .collect();
        Partition { groups }
    }
}

/// Scans a board for matches and builds the round's [`Partition`].
///
/// # Example
///
/// ```
/// use cascade_core::board::{Board, Pos};
/// use cascade_core::detector::MatchDetector;
/// use cascade_core::rules::Direction;
///
/// let board: Board = "A1 A1 A1\n. . .".parse().unwrap();
/// let partition = MatchDetector::new(&Direction::CANONICAL).detect(&board, false);
///
/// assert_eq!(partition.len(), 1);
/// assert_eq!(partition.groups()[0].len(), 3);
/// assert_eq!(partition.groups()[0].anchor, Pos::new(0, 1));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MatchDetector<'a> {
    directions: &'a [Direction],
}

impl<'a> MatchDetector<'a> {
    /// Creates a detector scanning the given directions in order.
    #[must_use]
    pub fn new(directions: &'a [Direction]) -> Self {
        Self { directions }
    }

    /// Runs one detection pass.
    ///
    /// `first_round` enables the swap-point anchor override: when a triple
    /// touches one of the board's swap points, its group's anchor moves to
    /// the first such position in `origin, n1, n2` order. The last triple
    /// processed for a group wins.
    #[must_use]
    pub fn detect(&self, board: &Board, first_round: bool) -> Partition {
        let shape = board.shape();
        let mut scratch = RoundScratch::new(board);

        for (origin, cell) in board.iter() {
            let Some(cell) = cell else { continue };

            for dir in self.directions {
                let Some(n1) = shape.step(origin, dir.d_row, dir.d_col, 1) else {
                    continue;
                };
                let Some(n2) = shape.step(origin, dir.d_row, dir.d_col, 2) else {
                    continue;
                };
                if !equivalent(Some(cell), board.get(n1)) || !equivalent(Some(cell), board.get(n2)) {
                    continue;
                }

                let triple = [origin, n1, n2];
                let id = scratch.merge(triple);

                if first_round {
                    if let Some(swap_point) = triple.into_iter().find(|&p| board.is_swap_point(p)) {
                        scratch.anchors[id.index()] = swap_point;
                    }
                }
            }
        }

        scratch.into_partition()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Partition {
        let board: Board = text.parse().unwrap();
        MatchDetector::new(&Direction::CANONICAL).detect(&board, false)
    }

    fn sorted(group: &MergeGroup) -> Vec<Pos> {
        let mut members = group.members.clone();
        members.sort();
        members
    }

    mod shape_tests {
        use super::*;

        #[test]
        fn no_match_on_mixed_board() {
            assert!(detect("A1 A2 A1\nB1 B2 B1\nA2 B1 A1").is_empty());
        }

        #[test]
        fn horizontal_run_of_three() {
            let partition = detect("A1 A1 A1\n. . .");
            assert_eq!(partition.len(), 1);
            let group = &partition.groups()[0];
            assert_eq!(group.len(), 3);
            assert_eq!(group.anchor, Pos::new(0, 1));
        }

        #[test]
        fn vertical_run_anchor_is_middle() {
            let partition = detect("B2\nB2\nB2");
            assert_eq!(partition.len(), 1);
            assert_eq!(partition.groups()[0].anchor, Pos::new(1, 0));
        }

        #[test]
        fn diagonal_runs() {
            let down_right = detect("A1 . .\n. A1 .\n. . A1");
            assert_eq!(down_right.len(), 1);
            assert_eq!(down_right.groups()[0].anchor, Pos::new(1, 1));

            let down_left = detect(". . C3\n. C3 .\nC3 . .");
            assert_eq!(down_left.len(), 1);
            assert_eq!(down_left.groups()[0].len(), 3);
        }

        #[test]
        fn run_of_four_is_one_group() {
            let partition = detect("A1 A1 A1 A1");
            assert_eq!(partition.len(), 1);
            assert_eq!(partition.groups()[0].len(), 4);
            assert_eq!(partition.groups()[0].anchor, Pos::new(0, 1));
        }

        #[test]
        fn l_shape_is_one_group_of_five() {
            let partition = detect("A1 . .\nA1 . .\nA1 A1 A1");
            assert_eq!(partition.len(), 1);
            let group = &partition.groups()[0];
            assert_eq!(group.len(), 5);
            assert_eq!(group.anchor, Pos::new(1, 0));
        }

        #[test]
        fn plus_shape_is_one_group_of_five() {
            let partition = detect(". A1 .\nA1 A1 A1\n. A1 .");
            assert_eq!(partition.len(), 1);
            assert_eq!(partition.groups()[0].len(), 5);
        }

        #[test]
        fn different_levels_do_not_match() {
            assert!(detect("A1 A1 A2").is_empty());
        }

        #[test]
        fn separate_runs_are_separate_groups() {
            let partition = detect("A1 A1 A1\n. . .\nB1 B1 B1");
            assert_eq!(partition.len(), 2);
            assert!(partition.groups().iter().all(|g| g.len() == 3));
            assert_eq!(partition.matched(), 6);
            assert_eq!(
                partition.group_of(Pos::new(2, 0)).map(|g| g.anchor),
                Some(Pos::new(2, 1))
            );
        }

        #[test]
        fn unknown_family_is_ordinary() {
            assert_eq!(detect("?0 ?0 ?0").len(), 1);
        }
    }

    mod merge_tests {
        use super::*;

        fn detect_with(directions: &[Direction], text: &str) -> Partition {
            let board: Board = text.parse().unwrap();
            MatchDetector::new(directions).detect(&board, false)
        }

        #[test]
        fn distinct_groups_merge_into_nearest_neighbour_group() {
            let partition = detect_with(
                &[Direction::UP, Direction::LEFT],
                ". A1 A1\n. A1 A1\nA1 A1 A1",
            );
            assert_eq!(partition.len(), 2);

            let first = &partition.groups()[0];
            assert_eq!(
                sorted(first),
                vec![
                    Pos::new(0, 1),
                    Pos::new(1, 1),
                    Pos::new(2, 0),
                    Pos::new(2, 1),
                    Pos::new(2, 2),
                ]
            );
            assert_eq!(first.anchor, Pos::new(1, 1));

            let second = &partition.groups()[1];
            assert_eq!(sorted(second), vec![Pos::new(0, 2), Pos::new(1, 2)]);
            assert_eq!(second.anchor, Pos::new(1, 2));
        }

        #[test]
        fn untagged_nearest_neighbour_is_passed_over() {
            let partition = detect_with(
                &[Direction::UP, Direction::LEFT],
                "A1 . A1\nA1 . A1\nA1 A1 A1",
            );
            assert_eq!(partition.len(), 2);

            let first = &partition.groups()[0];
            assert_eq!(first.len(), 5);
            assert!(first.contains(Pos::new(2, 1)));
            assert!(first.contains(Pos::new(2, 2)));
            assert_eq!(first.anchor, Pos::new(1, 0));

            assert_eq!(partition.groups()[1].len(), 2);
        }

        #[test]
        fn groups_are_disjoint() {
            let partition = detect("A1 A1 A1 A1\nA1 A1 A1 A1\nA1 A1 A1 A1");
            let mut all: Vec<Pos> = partition.iter().flat_map(|g| g.members.clone()).collect();
            let total = all.len();
            all.sort();
            all.dedup();
            assert_eq!(all.len(), total);
            assert_eq!(total, 12);
        }
    }

    mod swap_anchor_tests {
        use super::*;

        #[test]
        fn first_round_anchor_moves_to_swap_point() {
            let mut board: Board = "A1 A1 .\n. A1 A1\n. . B1".parse().unwrap();
            board.swap(Pos::new(2, 2), Pos::new(1, 2));
            let detector = MatchDetector::new(&Direction::CANONICAL);

            let first = detector.detect(&board, true);
            assert_eq!(first.len(), 1);
            assert_eq!(first.groups()[0].anchor, Pos::new(2, 2));

            let later = detector.detect(&board, false);
            assert_eq!(later.groups()[0].anchor, Pos::new(1, 1));
        }

        #[test]
        fn last_swap_point_triple_sets_the_anchor() {
            // Triples are scanned from (1,2), (1,3), (1,4); the first touches
            // the swap point (1,0), the last touches (1,4).
            let mut board: Board = ". . . . .\nA1 A1 A1 A1 A1".parse().unwrap();
            board.swap(Pos::new(1, 0), Pos::new(1, 4));

            let partition = MatchDetector::new(&Direction::CANONICAL).detect(&board, true);
            assert_eq!(partition.len(), 1);
            assert_eq!(partition.groups()[0].len(), 5);
            assert_eq!(partition.groups()[0].anchor, Pos::new(1, 4));
        }

        #[test]
        fn override_ignored_without_swap_points() {
            let board: Board = "A1 A1 A1".parse().unwrap();
            let partition = MatchDetector::new(&Direction::CANONICAL).detect(&board, true);
            assert_eq!(partition.groups()[0].anchor, Pos::new(0, 1));
        }
    }
}
