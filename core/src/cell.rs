use serde::{Deserialize, Serialize};

use crate::Position;

/// Player-visible lifecycle of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    Hidden,
    Revealed,
    Flagged,
}

impl CellState {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One grid cell, owned exclusively by the board. `exploded` only carries
/// meaning for a revealed mine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    pub is_mine: bool,
    pub adjacent_mines: u8,
    pub state: CellState,
    pub exploded: bool,
}

impl Cell {
    pub(crate) const fn hidden_at(position: Position, is_mine: bool) -> Self {
        Self {
            position,
            is_mine,
            adjacent_mines: 0,
            state: CellState::Hidden,
            exploded: false,
        }
    }
}
