//! Board module: the grid of cells a cascade runs on.
//!
//! The [`Board`] is a fixed-size, row-major grid of optional [`Cell`]s with
//! the origin at the top-left and row indices increasing downward. Besides
//! the cells it remembers the two positions touched by the most recent
//! [`Board::swap`]; the detector uses them during the first round of the
//! cascade that swap triggers.
//!
//! # Isolation
//!
//! The board owns all of its data. [`Board::fresh_copy`] produces a fully
//! independent board (cells copied, swap points cleared), which is what the
//! search hands to every candidate evaluation.
//!
//! # Example
//!
//! ```
//! use cascade_core::board::{Board, Pos};
//!
//! let mut board: Board = "A1 A1 .\n. A1 A1\n. . B1".parse().unwrap();
//! board.swap(Pos::new(2, 2), Pos::new(1, 2));
//!
//! assert_eq!(board.to_string(), "A1 A1 .\n. A1 B1\n. . A1");
//! assert!(board.is_swap_point(Pos::new(2, 2)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cell::{parse_slot, Cell};
use crate::error::{Error, Result};

// =============================================================================
// Positions and shapes
// =============================================================================

/// Zero-based grid coordinate.
///
/// `Display` prints the 1-based `(row, col)` form used at the outer
/// interface; `Debug` prints the raw zero-based value.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// Row index, 0 at the top
    pub row: usize,
    /// Column index, 0 at the left
    pub col: usize,
}

impl Pos {
    /// Creates a zero-based position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Creates a position from 1-based coordinates.
    ///
    /// Returns `None` if either coordinate is 0.
    #[must_use]
    pub fn from_one_based(row: usize, col: usize) -> Option<Self> {
        Some(Self::new(row.checked_sub(1)?, col.checked_sub(1)?))
    }

    /// Returns the 1-based `(row, col)` pair.
    #[must_use]
    pub const fn one_based(self) -> (usize, usize) {
        (self.row + 1, self.col + 1)
    }

    /// Manhattan distance to another position.
    #[must_use]
    pub fn manhattan(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.one_based();
        write!(f, "({row}, {col})")
    }
}

/// Grid dimensions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl GridShape {
    /// Creates a shape.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of positions in the grid.
    #[must_use]
    pub const fn len(self) -> usize {
        self.rows * self.cols
    }

    /// Returns true if the shape has no positions.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns true if `pos` lies inside the grid.
    #[must_use]
    pub const fn contains(self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Moves `pos` by `steps` times `(d_row, d_col)`, returning `None` if the
    /// result leaves the grid.
    #[must_use]
    pub fn step(self, pos: Pos, d_row: i32, d_col: i32, steps: i32) -> Option<Pos> {
        let row = offset(pos.row, d_row * steps)?;
        let col = offset(pos.col, d_col * steps)?;
        let moved = Pos::new(row, col);
        self.contains(moved).then_some(moved)
    }

    /// Iterates every position in row-major order.
    pub fn positions(self) -> impl Iterator<Item = Pos> + Clone {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Pos::new(row, col)))
    }
}

impl Default for GridShape {
    /// The 6x6 board of the observed game.
    fn default() -> Self {
        Self::new(6, 6)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

fn offset(base: usize, delta: i32) -> Option<usize> {
    let delta_abs = usize::try_from(delta.unsigned_abs()).ok()?;
    if delta < 0 {
        base.checked_sub(delta_abs)
    } else {
        base.checked_add(delta_abs)
    }
}

// =============================================================================
// Board
// =============================================================================

/// Rectangular grid of optional cells plus the active swap points.
///
/// Serialized as a list of rows; the swap points are transient cascade state
/// and are not part of the serialized form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<Cell>>>", into = "Vec<Vec<Option<Cell>>>")]
pub struct Board {
    shape: GridShape,
    cells: Vec<Option<Cell>>,
    swap_points: Option<(Pos, Pos)>,
}

impl Board {
    /// Builds a board from rows of optional cells.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyGrid`] if there are no rows or the first row is empty
    /// - [`Error::RaggedRow`] if any row differs in length from the first
    pub fn from_rows(rows: Vec<Vec<Option<Cell>>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || cols == 0 {
            return Err(Error::EmptyGrid {
                rows: rows.len(),
                cols,
            });
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(Error::RaggedRow {
                row,
                expected: cols,
                found,
            });
        }

        let shape = GridShape::new(rows.len(), cols);
        Ok(Self {
            shape,
            cells: rows.into_iter().flatten().collect(),
            swap_points: None,
        })
    }

    /// Creates a board with every slot empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyGrid`] if either dimension is zero.
    pub fn empty(shape: GridShape) -> Result<Self> {
        if shape.is_empty() {
            return Err(Error::EmptyGrid {
                rows: shape.rows,
                cols: shape.cols,
            });
        }
        Ok(Self {
            shape,
            cells: vec![None; shape.len()],
            swap_points: None,
        })
    }

    /// Returns an independent copy with the same cells and no swap points.
    #[must_use]
    pub fn fresh_copy(&self) -> Self {
        Self {
            shape: self.shape,
            cells: self.cells.clone(),
            swap_points: None,
        }
    }

    /// Returns the grid dimensions.
    #[must_use]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(
            self.shape.contains(pos),
            "position {pos:?} outside {} board",
            self.shape
        );
        pos.row * self.shape.cols + pos.col
    }

    /// Returns the cell at `pos`, or `None` if the slot is empty or out of
    /// range.
    #[must_use]
    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        if !self.shape.contains(pos) {
            return None;
        }
        self.cells[pos.row * self.shape.cols + pos.col].as_ref()
    }

    /// Replaces the slot at `pos` and returns its previous content.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of range.
    pub fn set(&mut self, pos: Pos, cell: Option<Cell>) -> Option<Cell> {
        let idx = self.index(pos);
        std::mem::replace(&mut self.cells[idx], cell)
    }

    /// Empties the slot at `pos` and returns its previous content.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of range.
    pub fn take(&mut self, pos: Pos) -> Option<Cell> {
        self.set(pos, None)
    }

    /// Iterates every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + Clone {
        self.shape.positions()
    }

    /// Iterates `(position, slot)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Option<&Cell>)> + '_ {
        self.shape
            .positions()
            .zip(self.cells.iter().map(Option::as_ref))
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Exchanges the contents of two slots (including emptiness) and records
    /// them as the swap points of the upcoming cascade.
    ///
    /// # Panics
    ///
    /// Panics if either position is out of range or the positions are equal.
    /// Both are caller bugs; the search never produces them.
    pub fn swap(&mut self, a: Pos, b: Pos) {
        assert_ne!(a, b, "cannot swap a position with itself");
        let ia = self.index(a);
        let ib = self.index(b);
        self.cells.swap(ia, ib);
        self.swap_points = Some((a, b));
    }

    /// Returns the positions recorded by the last [`swap`](Self::swap), if
    /// the cascade it triggered has not finished yet.
    #[must_use]
    pub fn swap_points(&self) -> Option<(Pos, Pos)> {
        self.swap_points
    }

    /// Returns true if `pos` is one of the active swap points.
    #[must_use]
    pub fn is_swap_point(&self, pos: Pos) -> bool {
        self.swap_points.is_some_and(|(a, b)| a == pos || b == pos)
    }

    /// Forgets the swap points once their cascade is fully resolved.
    pub fn clear_swap_points(&mut self) {
        self.swap_points = None;
    }

    /// Compacts every column downward.
    ///
    /// Occupied cells keep their top-to-bottom order and settle at the bottom
    /// of their column; the vacated slots end up empty at the top. Columns
    /// never exchange cells.
    pub fn apply_gravity(&mut self) {
        let GridShape { rows, cols } = self.shape;
        for col in 0..cols {
            let mut write = rows;
            for row in (0..rows).rev() {
                let idx = row * cols + col;
                if self.cells[idx].is_some() {
                    write -= 1;
                    if write != row {
                        let cell = self.cells[idx].take();
                        self.cells[write * cols + col] = cell;
                    }
                }
            }
        }
    }

    /// Returns true if no column has an empty slot below an occupied one.
    #[must_use]
    pub fn is_compacted(&self) -> bool {
        let GridShape { rows, cols } = self.shape;
        (0..cols).all(|col| {
            let mut seen_piece = false;
            (0..rows).all(|row| {
                let occupied = self.cells[row * cols + col].is_some();
                seen_piece |= occupied;
                occupied || !seen_piece
            })
        })
    }

    /// Copies the grid out as rows of optional cells.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Option<Cell>>> {
        self.cells
            .chunks(self.shape.cols)
            .map(<[Option<Cell>]>::to_vec)
            .collect()
    }
}

impl TryFrom<Vec<Vec<Option<Cell>>>> for Board {
    type Error = Error;

    fn try_from(rows: Vec<Vec<Option<Cell>>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<Option<Cell>>> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parses the text board format: one row per line, whitespace-separated
    /// slots (`A1`, `.`), blank lines and `#` comment lines ignored.
    fn from_str(text: &str) -> Result<Self> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.split_whitespace().map(parse_slot).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<Vec<_>>>>()?;
        Self::from_rows(rows)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_idx, row) in self.cells.chunks(self.shape.cols).enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            for (col_idx, slot) in row.iter().enumerate() {
                if col_idx > 0 {
                    f.write_str(" ")?;
                }
                match slot {
                    Some(cell) => write!(f, "{cell}")?,
                    None => f.write_str(".")?,
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("shape", &self.shape)
            .field("swap_points", &self.swap_points)
            .field("cells", &format_args!("\n{self}"))
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
