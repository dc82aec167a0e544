//! Game rules: the tunable constants of the simulation.
//!
//! All of them are plain data with serde support so a caller can load them
//! from a file. The defaults describe the observed game: a 6x6 board, pieces
//! capped at level 5, and the four canonical scan directions.

use serde::{Deserialize, Serialize};

use crate::board::{Board, GridShape};
use crate::error::{Error, Result};

/// Default maximum piece level.
pub const DEFAULT_MAX_LEVEL: u8 = 5;

/// Default points per removed piece beyond the first two, for levels 1-4.
///
/// Levels outside the table score nothing, so merging max-level pieces is
/// worth 0 points.
pub const DEFAULT_LEVEL_POINTS: [u32; 4] = [1, 2, 4, 8];

/// A scan direction for match detection, as a `(row, col)` step.
///
/// The detector walks one and two steps along each configured direction from
/// every occupied cell. The four canonical directions point "backwards" in
/// row-major order, so together with their opposites they cover all eight
/// neighbours exactly once over a full scan.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    /// Row step (negative is up)
    pub d_row: i32,
    /// Column step (negative is left)
    pub d_col: i32,
}

impl Direction {
    /// One row up.
    pub const UP: Self = Self::new(-1, 0);
    /// One row up, one column left.
    pub const UP_LEFT: Self = Self::new(-1, -1);
    /// One row up, one column right.
    pub const UP_RIGHT: Self = Self::new(-1, 1);
    /// One column left.
    pub const LEFT: Self = Self::new(0, -1);

    /// The canonical scan order: up, up-left, up-right, left.
    pub const CANONICAL: [Self; 4] = [Self::UP, Self::UP_LEFT, Self::UP_RIGHT, Self::LEFT];

    /// Creates a direction from a row and column step.
    #[must_use]
    pub const fn new(d_row: i32, d_col: i32) -> Self {
        Self { d_row, d_col }
    }

    /// Returns true for the zero step, which is not a usable direction.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.d_row == 0 && self.d_col == 0
    }
}

/// Simulation rules.
///
/// # Example
///
/// ```
/// use cascade_core::rules::Rules;
///
/// let rules = Rules::default();
/// assert_eq!(rules.max_level, 5);
/// assert_eq!(rules.points_for_level(1), 1);
/// assert_eq!(rules.points_for_level(5), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Expected board dimensions
    pub shape: GridShape,
    /// Highest level a piece can reach; upgrades clamp to it
    pub max_level: u8,
    /// Points per extra removed piece, indexed by `level - 1`
    pub level_points: Vec<u32>,
    /// Directions scanned by the match detector, in scan order
    pub scan_directions: Vec<Direction>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            shape: GridShape::default(),
            max_level: DEFAULT_MAX_LEVEL,
            level_points: DEFAULT_LEVEL_POINTS.to_vec(),
            scan_directions: Direction::CANONICAL.to_vec(),
        }
    }
}

impl Rules {
    /// Default rules for a board of the given shape.
    #[must_use]
    pub fn for_shape(shape: GridShape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    /// Points a group of the given level earns per piece beyond the first
    /// two. Levels not covered by the table (0, and 5 or more by default)
    /// earn nothing.
    #[must_use]
    pub fn points_for_level(&self, level: u8) -> u32 {
        usize::from(level)
            .checked_sub(1)
            .and_then(|idx| self.level_points.get(idx))
            .copied()
            .unwrap_or(0)
    }

    /// Checks that the rules are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRules`] for an empty shape, a zero maximum
    /// level, no scan directions, or a zero direction.
    pub fn validate(&self) -> Result<()> {
        if self.shape.is_empty() {
            return Err(Error::InvalidRules("board shape must be non-empty"));
        }
        if self.max_level == 0 {
            return Err(Error::InvalidRules("max_level must be at least 1"));
        }
        if self.scan_directions.is_empty() {
            return Err(Error::InvalidRules("at least one scan direction is required"));
        }
        if self.scan_directions.iter().any(|d| d.is_zero()) {
            return Err(Error::InvalidRules("scan directions must be non-zero"));
        }
        Ok(())
    }

    /// Checks that `board` has the configured shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the shapes differ.
    pub fn check_board(&self, board: &Board) -> Result<()> {
        if board.shape() == self.shape {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                expected: self.shape,
                found: board.shape(),
            })
        }
    }
}
