//! Error types for board construction and rules validation.
//!
//! Everything here is a malformed-input failure detected before any
//! simulation starts. Misuse of the swap primitive is a programming error and
//! panics instead (see [`Board::swap`](crate::board::Board::swap)).

use thiserror::Error;

use crate::board::{GridShape, Pos};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building a board or validating rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The grid has no rows, or its first row has no columns.
    #[error("board must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid {
        /// Number of rows supplied
        rows: usize,
        /// Number of columns in the first row
        cols: usize,
    },

    /// A row's length differs from the first row's.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        found: usize,
    },

    /// The board's shape does not match the shape configured in the rules.
    #[error("board is {found}, rules expect {expected}")]
    ShapeMismatch {
        /// Shape from the rules
        expected: GridShape,
        /// Shape of the board
        found: GridShape,
    },

    /// A cell token could not be parsed.
    #[error("invalid cell {token:?}: {reason}")]
    InvalidCell {
        /// The offending text
        token: String,
        /// What was wrong with it
        reason: &'static str,
    },

    /// A requested swap names an out-of-range position or the same position
    /// twice.
    #[error("cannot swap {a} with {b} on a {shape} board")]
    InvalidSwap {
        /// First position
        a: Pos,
        /// Second position
        b: Pos,
        /// Board dimensions
        shape: GridShape,
    },

    /// The rules are unusable.
    #[error("invalid rules: {0}")]
    InvalidRules(&'static str),

    /// The random board generator is misconfigured.
    #[error("invalid generator: {0}")]
    InvalidGenerator(&'static str),
}
