use ndarray::Array2;
use rand::RngCore;

use super::{GridGenerator, apply_adjacency_counts, blank_grid};
use crate::{Cell, CellCount, Coord, Position, ToNdIndex};

/// Deterministic strategy that places mines at fixed positions, ignoring the
/// requested count and the randomness source. Out-of-bounds entries are
/// dropped. Intended for reproducible boards in tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresetMineGenerator {
    mines: Vec<Position>,
}

impl PresetMineGenerator {
    pub fn new(mines: impl Into<Vec<Position>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl GridGenerator for PresetMineGenerator {
    fn generate(
        &mut self,
        rows: Coord,
        columns: Coord,
        _mines: CellCount,
        _rng: &mut dyn RngCore,
    ) -> Array2<Cell> {
        let mut cells = blank_grid(rows, columns);
        for &(row, col) in &self.mines {
            if row < rows && col < columns {
                cells[(row, col).to_nd_index()].is_mine = true;
            }
        }

        apply_adjacency_counts(&mut cells);
        cells
    }
}
