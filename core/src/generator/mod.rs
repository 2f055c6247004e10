use ndarray::Array2;
use rand::RngCore;

use crate::{Cell, CellCount, Coord, NeighborIterExt, Position, ToNdIndex};

pub use preset::*;
pub use random::*;

mod preset;
mod random;

/// Mine-placement strategy injected into board construction. Implementations
/// return a fully populated hidden grid: mines placed and every non-mine cell
/// carrying its exact neighbor count.
pub trait GridGenerator: Send + std::fmt::Debug {
    fn generate(
        &mut self,
        rows: Coord,
        columns: Coord,
        mines: CellCount,
        rng: &mut dyn RngCore,
    ) -> Array2<Cell>;
}

/// Writes `adjacent_mines` for every non-mine cell from the placed mines.
fn apply_adjacency_counts(cells: &mut Array2<Cell>) {
    let mine_positions: Vec<Position> = cells
        .iter()
        .filter(|cell| cell.is_mine)
        .map(|cell| cell.position)
        .collect();

    for position in mine_positions {
        for neighbor in cells.iter_neighbors(position) {
            let cell = &mut cells[neighbor.to_nd_index()];
            if !cell.is_mine {
                cell.adjacent_mines += 1;
            }
        }
    }
}

fn blank_grid(rows: Coord, columns: Coord) -> Array2<Cell> {
    Array2::from_shape_fn((usize::from(rows), usize::from(columns)), |(row, col)| {
        Cell::hidden_at((row as Coord, col as Coord), false)
    })
}
