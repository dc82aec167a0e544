//! # Cascade Python Bindings
//!
//! PyO3 bindings exposing the best-swap search to Python.
//!
//! Grids are lists of rows; each slot is `None` or a `(family, level)` tuple.
//! Positions are 1-based `(row, col)` tuples on both sides of the boundary.
//! Family names must be non-empty, free of whitespace, must not start with
//! `#` and must not end in a digit; other names raise `ValueError`.
//!
//! ## Usage
//!
//! ```python
//! import _cascade
//!
//! grid = [
//!     [("A", 1), ("A", 1), None],
//!     [None, ("A", 1), ("A", 1)],
//!     [None, None, ("B", 1)],
//! ]
//!
//! best, score = _cascade.find_best_swap(grid)
//! if best is None:
//!     print("no beneficial swap")
//! else:
//!     print(f"swap {best[0]} with {best[1]} for {score} points")
//!
//! report = _cascade.simulate_swap(grid, (3, 3), (2, 3))
//! print(report.score, report.rounds, report.board)
//!
//! rules = _cascade.PyRules(level_points=[10, 20, 40, 80])
//! best, score = _cascade.find_best_swap(grid, rules)
//! ```

use cascade_core::rules::DEFAULT_MAX_LEVEL;
use cascade_core::{Board, Cell, CascadeReport, Direction, Family, GridShape, Pos, Rules, SwapMove};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// One slot as Python sees it.
type PySlot = Option<(String, u8)>;

/// A 1-based `(row, col)` pair.
type PyPos = (usize, usize);

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn board_from_grid(grid: Vec<Vec<PySlot>>) -> PyResult<Board> {
    let rows = grid
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|slot| {
                    slot.map(|(family, level)| Family::parse(&family).map(|f| Cell::new(f, level)))
                        .transpose()
                })
                .collect::<cascade_core::Result<Vec<_>>>()
        })
        .collect::<cascade_core::Result<Vec<_>>>()
        .map_err(value_error)?;
    Board::from_rows(rows).map_err(value_error)
}

fn grid_from_board(board: &Board) -> Vec<Vec<PySlot>> {
    board
        .to_rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|slot| slot.map(|cell| (cell.family.as_str().to_owned(), cell.level)))
                .collect()
        })
        .collect()
}

fn pos_from_py((row, col): PyPos) -> PyResult<Pos> {
    Pos::from_one_based(row, col)
        .ok_or_else(|| PyValueError::new_err(format!("positions are 1-based, got ({row}, {col})")))
}

/// Rules wrapper for Python.
///
/// Every argument is optional. Without `shape` the rules adopt the shape of
/// whichever grid they are used with.
#[pyclass(frozen)]
#[derive(Clone)]
pub struct PyRules {
    shape: Option<GridShape>,
    inner: Rules,
}

impl PyRules {
    fn for_board(&self, board: &Board) -> Rules {
        Rules {
            shape: self.shape.unwrap_or_else(|| board.shape()),
            ..self.inner.clone()
        }
    }
}

#[pymethods]
impl PyRules {
    /// Create a rules bundle.
    #[new]
    #[pyo3(signature = (shape=None, max_level=DEFAULT_MAX_LEVEL, level_points=None, directions=None))]
    fn new(
        shape: Option<(usize, usize)>,
        max_level: u8,
        level_points: Option<Vec<u32>>,
        directions: Option<Vec<(i32, i32)>>,
    ) -> PyResult<Self> {
        let shape = shape.map(|(rows, cols)| GridShape::new(rows, cols));
        let defaults = Rules::default();
        let inner = Rules {
            shape: shape.unwrap_or(defaults.shape),
            max_level,
            level_points: level_points.unwrap_or(defaults.level_points),
            scan_directions: directions.map_or(defaults.scan_directions, |dirs| {
                dirs.into_iter().map(|(d_row, d_col)| Direction::new(d_row, d_col)).collect()
            }),
        };
        inner.validate().map_err(value_error)?;
        Ok(Self { shape, inner })
    }

    /// Board shape as `(rows, cols)`, or `None` to follow the grid.
    #[getter]
    fn shape(&self) -> Option<(usize, usize)> {
        self.shape.map(|s| (s.rows, s.cols))
    }

    /// Highest level a piece can reach.
    #[getter]
    fn max_level(&self) -> u8 {
        self.inner.max_level
    }

    /// Points per extra piece, indexed by level - 1.
    #[getter]
    fn level_points(&self) -> Vec<u32> {
        self.inner.level_points.clone()
    }

    /// Scan directions as `(d_row, d_col)` steps.
    #[getter]
    fn directions(&self) -> Vec<(i32, i32)> {
        self.inner
            .scan_directions
            .iter()
            .map(|d| (d.d_row, d.d_col))
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "Rules(shape={:?}, max_level={}, level_points={:?}, directions={:?})",
            self.shape(),
            self.inner.max_level,
            self.inner.level_points,
            self.directions()
        )
    }
}

/// Outcome of simulating one swap.
#[pyclass(frozen)]
pub struct PyCascadeReport {
    /// Total score over every round.
    #[pyo3(get)]
    pub score: u64,
    /// Pieces removed over every round.
    #[pyo3(get)]
    pub removed: usize,
    /// Number of rounds that resolved at least one group.
    #[pyo3(get)]
    pub rounds: usize,
    board: Vec<Vec<PySlot>>,
}

impl PyCascadeReport {
    fn new(report: &CascadeReport, board: &Board) -> Self {
        Self {
            score: report.score,
            removed: report.removed,
            rounds: report.rounds(),
            board: grid_from_board(board),
        }
    }
}

#[pymethods]
impl PyCascadeReport {
    /// Board at the cascade's fixed point.
    #[getter]
    fn board(&self) -> Vec<Vec<PySlot>> {
        self.board.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "CascadeReport(score={}, removed={}, rounds={})",
            self.score, self.removed, self.rounds
        )
    }
}

/// Find the highest-scoring swap.
///
/// Returns `(((r1, c1), (r2, c2)), score)`, or `(None, 0)` when no swap
/// scores.
#[pyfunction]
#[pyo3(name = "find_best_swap", signature = (grid, rules=None))]
fn py_find_best_swap(
    py: Python<'_>,
    grid: Vec<Vec<PySlot>>,
    rules: Option<PyRef<'_, PyRules>>,
) -> PyResult<(Option<(PyPos, PyPos)>, u64)> {
    let board = board_from_grid(grid)?;
    let rules = rules.map_or_else(|| Rules::for_shape(board.shape()), |r| r.for_board(&board));

    let outcome = py
        .allow_threads(|| cascade_core::find_best_swap(&board, &rules))
        .map_err(value_error)?;
    Ok((outcome.best.map(SwapMove::one_based), outcome.score))
}

/// Simulate swapping two 1-based positions.
#[pyfunction]
#[pyo3(name = "simulate_swap", signature = (grid, a, b, rules=None))]
fn py_simulate_swap(
    grid: Vec<Vec<PySlot>>,
    a: PyPos,
    b: PyPos,
    rules: Option<PyRef<'_, PyRules>>,
) -> PyResult<PyCascadeReport> {
    let board = board_from_grid(grid)?;
    let rules = rules.map_or_else(|| Rules::for_shape(board.shape()), |r| r.for_board(&board));
    let mv = SwapMove::new(pos_from_py(a)?, pos_from_py(b)?);

    let (end, report) = cascade_core::simulate_swap(&board, mv, &rules).map_err(value_error)?;
    Ok(PyCascadeReport::new(&report, &end))
}

/// Python module definition.
#[pymodule]
fn _cascade(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRules>()?;
    m.add_class::<PyCascadeReport>()?;
    m.add_function(wrap_pyfunction!(py_find_best_swap, m)?)?;
    m.add_function(wrap_pyfunction!(py_simulate_swap, m)?)?;
    Ok(())
}
