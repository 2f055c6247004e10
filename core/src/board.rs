use std::collections::{BTreeSet, VecDeque};

use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use smallvec::SmallVec;

use crate::{
    Cell, CellCount, CellState, Coord, GameError, GridGenerator, NeighborIterExt, Position,
    RandomGridGenerator, Result, ToNdIndex, mult,
};

/// Cells changed by a reveal, plus whether a mine went off.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RevealOutcome {
    pub revealed_cells: Vec<Cell>,
    pub hit_mine: bool,
}

/// The cell after a flag toggle and whether a flag was added.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ToggleOutcome {
    pub updated_cell: Cell,
    pub flag_added: bool,
}

/// Rectangular minefield: owns the grid, mine placement, and the reveal/flag
/// primitives the engine drives. Every non-mine cell's `adjacent_mines` stays
/// equal to its exact mine-neighbor count through all mutations.
#[derive(Debug)]
pub struct Board {
    rows: Coord,
    columns: Coord,
    mine_count: CellCount,
    cells: Array2<Cell>,
    revealed_safe_cells: CellCount,
    rng: SmallRng,
    generator: Box<dyn GridGenerator>,
}

impl Board {
    /// Creates a board with uniformly random mine placement.
    pub fn new(rows: Coord, columns: Coord, mine_count: CellCount) -> Result<Self> {
        Self::with_generator(rows, columns, mine_count, Box::new(RandomGridGenerator))
    }

    /// Creates a board with an injected placement strategy.
    pub fn with_generator(
        rows: Coord,
        columns: Coord,
        mine_count: CellCount,
        generator: Box<dyn GridGenerator>,
    ) -> Result<Self> {
        validate_dimensions(rows, columns, mine_count)?;

        let mut board = Self {
            rows,
            columns,
            mine_count,
            cells: Array2::from_shape_fn((0, 0), |_| Cell::hidden_at((0, 0), false)),
            revealed_safe_cells: 0,
            rng: SmallRng::from_os_rng(),
            generator,
        };
        board.populate();
        Ok(board)
    }

    fn populate(&mut self) {
        self.cells = self
            .generator
            .generate(self.rows, self.columns, self.mine_count, &mut self.rng);
        self.mine_count = self
            .cells
            .iter()
            .filter(|cell| cell.is_mine)
            .count()
            .try_into()
            .unwrap();
        self.revealed_safe_cells = 0;
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn columns(&self) -> Coord {
        self.columns
    }

    pub const fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub const fn revealed_safe_cells(&self) -> CellCount {
        self.revealed_safe_cells
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }

    pub fn total_safe_cells(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn all_safe_cells_revealed(&self) -> bool {
        self.revealed_safe_cells == self.total_safe_cells()
    }

    pub fn in_bounds(&self, (row, col): Position) -> bool {
        row < self.rows && col < self.columns
    }

    pub fn validate_position(&self, position: Position) -> Result<Position> {
        if self.in_bounds(position) {
            Ok(position)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn cell_at(&self, position: Position) -> Result<Cell> {
        let position = self.validate_position(position)?;
        Ok(self.cells[position.to_nd_index()])
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// Up to eight surrounding cells in fixed row-major offset order.
    pub fn neighbors(&self, position: Position) -> SmallVec<[Cell; 8]> {
        self.cells
            .iter_neighbors(position)
            .map(|neighbor| self.cells[neighbor.to_nd_index()])
            .collect()
    }

    /// Reveals a cell. Zero-adjacency cells flood outward breadth-first until
    /// bounded by numbered cells; flagged cells and mines are never expanded
    /// into nor force-revealed.
    pub fn reveal(&mut self, position: Position) -> Result<RevealOutcome> {
        let position = self.validate_position(position)?;
        let mut outcome = RevealOutcome::default();

        let start = self.cells[position.to_nd_index()];
        if start.state.is_flagged() || start.state.is_revealed() {
            return Ok(outcome);
        }

        if start.is_mine {
            let cell = &mut self.cells[position.to_nd_index()];
            cell.state = CellState::Revealed;
            cell.exploded = true;
            outcome.hit_mine = true;
            outcome.revealed_cells.push(*cell);
            return Ok(outcome);
        }

        let mut visited = BTreeSet::from([position]);
        let mut frontier = VecDeque::from([position]);

        while let Some(current) = frontier.pop_front() {
            let cell = &mut self.cells[current.to_nd_index()];
            if !cell.state.is_revealed() {
                cell.state = CellState::Revealed;
                cell.exploded = false;
                outcome.revealed_cells.push(*cell);
                self.revealed_safe_cells += 1;
            }

            if self.cells[current.to_nd_index()].adjacent_mines != 0 {
                continue;
            }

            for neighbor in self.cells.iter_neighbors(current) {
                if !visited.insert(neighbor) {
                    continue;
                }
                let neighbor_cell = self.cells[neighbor.to_nd_index()];
                if neighbor_cell.is_mine || neighbor_cell.state.is_flagged() {
                    continue;
                }
                frontier.push_back(neighbor);
            }
        }

        Ok(outcome)
    }

    /// Flags or unflags a cell. Revealed cells are immutable to flagging.
    pub fn toggle_flag(&mut self, position: Position) -> Result<ToggleOutcome> {
        let position = self.validate_position(position)?;
        let cell = &mut self.cells[position.to_nd_index()];

        let flag_added = match cell.state {
            CellState::Revealed => {
                return Ok(ToggleOutcome {
                    updated_cell: *cell,
                    flag_added: false,
                });
            }
            CellState::Hidden => {
                cell.state = CellState::Flagged;
                true
            }
            CellState::Flagged => {
                cell.state = CellState::Hidden;
                false
            }
        };
        cell.exploded = false;

        Ok(ToggleOutcome {
            updated_cell: *cell,
            flag_added,
        })
    }

    /// Guarantees `position` holds no mine by relocating its mine, if any, to
    /// the first non-mine cell in row-major scan order. Adjacency counts are
    /// patched incrementally around both cells instead of rescanning the grid.
    pub fn ensure_safe_cell(&mut self, position: Position) -> Result<()> {
        let position = self.validate_position(position)?;
        if !self.cells[position.to_nd_index()].is_mine {
            return Ok(());
        }

        let Some(target) = self
            .cells
            .iter()
            .find(|cell| !cell.is_mine)
            .map(|cell| cell.position)
        else {
            log::warn!("no free cell to relocate the mine at {position:?}");
            return Ok(());
        };

        self.cells[position.to_nd_index()].is_mine = false;
        for neighbor in self.cells.iter_neighbors(position) {
            let cell = &mut self.cells[neighbor.to_nd_index()];
            if !cell.is_mine {
                cell.adjacent_mines = cell.adjacent_mines.saturating_sub(1);
            }
        }

        let own_count = self
            .cells
            .iter_neighbors(position)
            .filter(|&neighbor| self.cells[neighbor.to_nd_index()].is_mine)
            .count() as u8;
        self.cells[position.to_nd_index()].adjacent_mines = own_count;

        for neighbor in self.cells.iter_neighbors(target) {
            let cell = &mut self.cells[neighbor.to_nd_index()];
            if !cell.is_mine {
                cell.adjacent_mines += 1;
            }
        }

        let target_cell = &mut self.cells[target.to_nd_index()];
        target_cell.is_mine = true;
        target_cell.adjacent_mines = 0;

        log::debug!("relocated mine from {position:?} to {target:?}");
        Ok(())
    }

    /// Reveals every still-covered mine; the engine's end-of-game sweep.
    pub fn reveal_remaining_mines(&mut self, exploded: bool) -> Vec<Cell> {
        let mut revealed = Vec::new();
        for cell in self.cells.iter_mut() {
            if cell.is_mine && !cell.state.is_revealed() {
                cell.state = CellState::Revealed;
                cell.exploded = exploded;
                revealed.push(*cell);
            }
        }
        revealed
    }

    /// Replaces dimensions and mine count, then repopulates from scratch.
    pub fn resize(&mut self, rows: Coord, columns: Coord, mine_count: CellCount) -> Result<()> {
        validate_dimensions(rows, columns, mine_count)?;
        self.rows = rows;
        self.columns = columns;
        self.mine_count = mine_count;
        self.regenerate();
        Ok(())
    }

    /// Reseeds the randomness source and repopulates the current dimensions.
    pub fn regenerate(&mut self) {
        self.rng = SmallRng::from_os_rng();
        self.populate();
    }
}

fn validate_dimensions(rows: Coord, columns: Coord, mine_count: CellCount) -> Result<()> {
    if rows == 0 || columns == 0 {
        return Err(GameError::InvalidConfig);
    }
    if mine_count == 0 || mine_count >= mult(rows, columns) {
        return Err(GameError::InvalidConfig);
    }
    Ok(())
}
