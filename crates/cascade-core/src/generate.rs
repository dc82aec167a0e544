//! Seeded random boards for demos and benchmarks.
//!
//! Boards are drawn from a ChaCha8 stream, so the same generator settings
//! and seed always produce the same board on every platform.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, GridShape, Pos};
use crate::cell::{Cell, Family};
use crate::error::{Error, Result};

/// Settings for random board generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardGenerator {
    /// Board dimensions
    pub shape: GridShape,
    /// Families to draw pieces from
    pub families: Vec<Family>,
    /// Pieces get a level in `1..=max_level`
    pub max_level: u8,
    /// Probability that a slot holds a piece
    pub fill: f64,
}

impl Default for BoardGenerator {
    fn default() -> Self {
        Self {
            shape: GridShape::default(),
            families: ["A", "B", "C", "D"].into_iter().map(Family::from).collect(),
            max_level: 2,
            fill: 1.0,
        }
    }
}

impl BoardGenerator {
    /// Generates a board from `seed`.
    ///
    /// Pieces are placed, then gravity is applied, so the board looks like
    /// one the game could show.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGenerator`] for an empty family list, a zero
    /// maximum level or a fill outside `0.0..=1.0`, and [`Error::EmptyGrid`]
    /// for an empty shape.
    pub fn generate(&self, seed: u64) -> Result<Board> {
        if self.families.is_empty() {
            return Err(Error::InvalidGenerator("at least one family is required"));
        }
        if self.max_level == 0 {
            return Err(Error::InvalidGenerator("max_level must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.fill) {
            return Err(Error::InvalidGenerator("fill must be within 0.0..=1.0"));
        }

        let mut board = Board::empty(self.shape)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let positions: Vec<Pos> = board.positions().collect();
        for pos in positions {
            if !rng.gen_bool(self.fill) {
                continue;
            }
            let Some(family) = self.families.choose(&mut rng) else {
                continue;
            };
            let level = rng.gen_range(1..=self.max_level);
            board.set(pos, Some(Cell::new(family.clone(), level)));
        }
        board.apply_gravity();
        Ok(board)
    }
}
