use ndarray::Array2;
use rand::RngCore;
use rand::seq::SliceRandom;

use super::{GridGenerator, apply_adjacency_counts, blank_grid};
use crate::{Cell, CellCount, Coord, ToNdIndex, mult};

/// Production strategy: a uniform random permutation of all cell indices with
/// the first `mines` entries becoming mines. Every placement is equally
/// likely; no cell is excluded up front.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RandomGridGenerator;

impl GridGenerator for RandomGridGenerator {
    fn generate(
        &mut self,
        rows: Coord,
        columns: Coord,
        mines: CellCount,
        rng: &mut dyn RngCore,
    ) -> Array2<Cell> {
        let total = usize::from(mult(rows, columns));
        let requested = usize::from(mines);
        if requested >= total {
            log::warn!("requested {requested} mines for {total} cells, capping below full");
        }
        let mines = requested.min(total.saturating_sub(1));

        let mut indices: Vec<usize> = (0..total).collect();
        indices.shuffle(rng);

        let columns_usize = usize::from(columns);
        let mut cells = blank_grid(rows, columns);
        for &index in &indices[..mines] {
            let position = ((index / columns_usize) as Coord, (index % columns_usize) as Coord);
            cells[position.to_nd_index()].is_mine = true;
        }

        apply_adjacency_counts(&mut cells);
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NeighborIterExt;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn places_exactly_the_requested_mines() {
        let mut rng = SmallRng::seed_from_u64(7);
        let cells = RandomGridGenerator.generate(9, 9, 10, &mut rng);

        let mine_count = cells.iter().filter(|cell| cell.is_mine).count();
        assert_eq!(mine_count, 10);
        assert!(cells.iter().all(|cell| cell.state.is_hidden()));
    }

    #[test]
    fn adjacency_counts_match_actual_neighborhoods() {
        let mut rng = SmallRng::seed_from_u64(42);
        let cells = RandomGridGenerator.generate(8, 12, 20, &mut rng);

        for cell in cells.iter() {
            if cell.is_mine {
                continue;
            }
            let expected = cells
                .iter_neighbors(cell.position)
                .filter(|&pos| cells[pos.to_nd_index()].is_mine)
                .count() as u8;
            assert_eq!(cell.adjacent_mines, expected, "cell {:?}", cell.position);
        }
    }

    #[test]
    fn caps_a_degenerate_mine_request_below_full() {
        let mut rng = SmallRng::seed_from_u64(3);
        let cells = RandomGridGenerator.generate(2, 2, 9, &mut rng);

        assert_eq!(cells.iter().filter(|cell| cell.is_mine).count(), 3);
    }
}
