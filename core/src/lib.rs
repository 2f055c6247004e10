use serde::{Deserialize, Serialize};

pub use analysis::*;
pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod analysis;
mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod types;

/// Smallest accepted board side.
pub const MIN_SIDE: Coord = 2;

/// Largest accepted board side.
pub const MAX_SIDE: Coord = 50;

/// Validated parameters for (re)creating a board. At least two cells must
/// stay free of mines so every game has a playable opening.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
}

impl BoardConfig {
    pub const fn new_unchecked(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    pub fn new(rows: Coord, columns: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(rows, columns, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let side_in_range = |side: Coord| (MIN_SIDE..=MAX_SIDE).contains(&side);
        if !side_in_range(self.rows) || !side_in_range(self.columns) {
            return Err(GameError::InvalidConfig);
        }

        if self.mines == 0 || self.mines > self.total_cells() - 2 {
            return Err(GameError::InvalidConfig);
        }

        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }
}

impl Default for BoardConfig {
    /// The classic intermediate board.
    fn default() -> Self {
        Self::new_unchecked(16, 16, 40)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_standard_boards() {
        assert!(BoardConfig::new(9, 9, 10).is_ok());
        assert!(BoardConfig::new(16, 16, 40).is_ok());
        assert!(BoardConfig::new(50, 50, 2498).is_ok());
    }

    #[test]
    fn rejects_out_of_range_sides() {
        assert_eq!(BoardConfig::new(1, 9, 5), Err(GameError::InvalidConfig));
        assert_eq!(BoardConfig::new(9, 1, 5), Err(GameError::InvalidConfig));
        assert_eq!(BoardConfig::new(51, 9, 5), Err(GameError::InvalidConfig));
    }

    #[test]
    fn rejects_mine_counts_that_leave_no_room() {
        assert_eq!(BoardConfig::new(9, 9, 0), Err(GameError::InvalidConfig));
        // 9x9 fits at most 79 mines
        assert_eq!(BoardConfig::new(9, 9, 80), Err(GameError::InvalidConfig));
        assert!(BoardConfig::new(9, 9, 79).is_ok());
    }
}
