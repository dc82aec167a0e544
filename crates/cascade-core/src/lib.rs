//! # Cascade Core
//!
//! Merge-board simulator and exhaustive best-swap search.
//!
//! This crate emulates a match-3 style merge puzzle: runs of three equivalent
//! pieces (straight or diagonal) merge into one upgraded piece, the board
//! settles under gravity, and new runs chain into further rounds. Given a
//! classified board it finds the single swap whose cascade scores highest.
//!
//! ## Architecture
//!
//! - **Board**: [`Board`] grid of optional [`Cell`]s plus the active swap points
//! - **Detection**: [`MatchDetector`] partitions matched cells into merge-groups
//! - **Resolution**: [`Resolver`] removes groups, spawns upgrades, applies gravity
//! - **Cascade**: [`run_swap`] loops detection and resolution to a fixed point
//! - **Search**: [`find_best_swap`] simulates every candidate on its own copy
//!
//! ## Usage
//!
//! ```
//! use cascade_core::{find_best_swap, Board, Rules};
//!
//! let board: Board = "A1 A1 .\n. A1 A1\n. . B1".parse()?;
//! let outcome = find_best_swap(&board, &Rules::for_shape(board.shape()))?;
//!
//! if let Some(best) = outcome.best {
//!     println!("swap {best} for {} points", outcome.score);
//! }
//! # Ok::<(), cascade_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod cascade;
pub mod cell;
pub mod detector;
pub mod error;
pub mod generate;
pub mod hash;
pub mod resolver;
pub mod rules;
pub mod search;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use board::{Board, GridShape, Pos};
pub use cascade::{run_swap, Cascade, CascadeReport};
pub use cell::{Cell, Family};
pub use detector::{MatchDetector, MergeGroup, Partition};
pub use error::{Error, Result};
pub use generate::BoardGenerator;
pub use hash::hash_board;
pub use resolver::{Resolver, RoundOutcome};
pub use rules::{Direction, Rules};
pub use search::{find_best_swap, find_best_swap_sequential, simulate_swap, SearchOutcome, SwapMove};
