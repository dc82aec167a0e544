//! Board hashing for determinism checks.
//!
//! Two boards with the same shape and the same pieces in the same slots hash
//! identically. Swap points are transient cascade state and are ignored.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::board::Board;

/// Compute a deterministic hash of a board's cells.
///
/// The hash covers:
/// - Shape (rows, columns)
/// - Every slot in row-major order (empty, or family and level)
#[must_use]
pub fn hash_board(board: &Board) -> u64 {
    let mut hasher = DefaultHasher::new();

    board.rows().hash(&mut hasher);
    board.cols().hash(&mut hasher);

    for (_, slot) in board.iter() {
        match slot {
            None => 0u8.hash(&mut hasher),
            Some(cell) => {
                1u8.hash(&mut hasher);
                cell.family.as_str().hash(&mut hasher);
                cell.level.hash(&mut hasher);
            }
        }
    }

    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    #[test]
    fn equal_boards_hash_equal() {
        let a: Board = "A1 .\nB2 C3".parse().unwrap();
        let b: Board = "A1 .\nB2 C3".parse().unwrap();
        assert_eq!(hash_board(&a), hash_board(&b));
    }

    #[test]
    fn any_change_changes_hash() {
        let a: Board = "A1 .\nB2 C3".parse().unwrap();
        let level: Board = "A1 .\nB2 C4".parse().unwrap();
        let moved: Board = ". A1\nB2 C3".parse().unwrap();
        assert_ne!(hash_board(&a), hash_board(&level));
        assert_ne!(hash_board(&a), hash_board(&moved));
    }

    #[test]
    fn shape_is_part_of_hash() {
        let wide: Board = ". . . .".parse().unwrap();
        let tall: Board = ". .\n. .".parse().unwrap();
        assert_ne!(hash_board(&wide), hash_board(&tall));
    }

    #[test]
    fn swap_points_are_ignored() {
        let a: Board = "A1 B1".parse().unwrap();
        let mut b: Board = "B1 A1".parse().unwrap();
        b.swap(Pos::new(0, 0), Pos::new(0, 1));
        assert_eq!(hash_board(&a), hash_board(&b));
    }
}
