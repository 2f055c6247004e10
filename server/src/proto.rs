//! Wire format for the API: camelCase JSON mirroring what the engine
//! reports, with mine identity concealed until a cell is revealed.

use clearmine_core::{
    AutoMarkResult, BoardConfig, BoardSnapshot, Cell, CellCount, CellState, Coord, FlagResult,
    GameError, GameStatus, Position, RevealResult, SelectionRect,
};
use serde::{Deserialize, Serialize};

/// A cell as clients see it. `is_mine` is true only for revealed mines and
/// `adjacent_mines` is nonzero only for revealed safe cells; covered cells
/// never leak what they hold.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub row: Coord,
    pub column: Coord,
    pub state: CellState,
    pub adjacent_mines: u8,
    pub is_mine: bool,
    pub exploded: bool,
}

impl From<Cell> for CellView {
    fn from(cell: Cell) -> Self {
        let revealed = cell.state.is_revealed();
        Self {
            row: cell.position.0,
            column: cell.position.1,
            state: cell.state,
            adjacent_mines: if revealed && !cell.is_mine {
                cell.adjacent_mines
            } else {
                0
            },
            is_mine: revealed && cell.is_mine,
            exploded: cell.exploded,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
    pub flags_remaining: CellCount,
    pub status: GameStatus,
    pub cells: Vec<CellView>,
}

impl From<BoardSnapshot> for BoardView {
    fn from(snapshot: BoardSnapshot) -> Self {
        Self {
            rows: snapshot.rows,
            columns: snapshot.columns,
            mines: snapshot.mines,
            flags_remaining: snapshot.flags_remaining,
            status: snapshot.status,
            cells: snapshot.cells.into_iter().map(CellView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealResponse {
    pub updated_cells: Vec<CellView>,
    pub hit_mine: bool,
    pub victory: bool,
    pub flags_remaining: CellCount,
    pub status: GameStatus,
}

impl RevealResponse {
    pub fn new(result: RevealResult, status: GameStatus) -> Self {
        Self {
            updated_cells: result.updated_cells.into_iter().map(CellView::from).collect(),
            hit_mine: result.hit_mine,
            victory: result.victory,
            flags_remaining: result.flags_remaining,
            status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagResponse {
    pub updated_cell: CellView,
    pub flags_remaining: CellCount,
    pub victory: bool,
    pub status: GameStatus,
}

impl FlagResponse {
    pub fn new(result: FlagResult, status: GameStatus) -> Self {
        Self {
            updated_cell: CellView::from(result.updated_cell),
            flags_remaining: result.flags_remaining,
            victory: result.victory,
            status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoMarkResponse {
    pub flagged_cells: Vec<CellView>,
    pub flags_remaining: CellCount,
    pub victory: bool,
    pub status: GameStatus,
}

impl AutoMarkResponse {
    /// Absent deductions still answer with the session's current counters.
    pub fn new(result: Option<AutoMarkResult>, flags_remaining: CellCount, status: GameStatus) -> Self {
        match result {
            Some(result) => Self {
                flagged_cells: result.flagged_cells.into_iter().map(CellView::from).collect(),
                flags_remaining: result.flags_remaining,
                victory: result.victory,
                status,
            },
            None => Self {
                flagged_cells: Vec::new(),
                flags_remaining,
                victory: matches!(status, GameStatus::Victory),
                status,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Cell coordinates as clients send them; wider than `Coord` so oversized
/// values fail range checking here instead of wrapping.
#[derive(Debug, Deserialize)]
pub struct PositionBody {
    pub row: u32,
    pub column: u32,
}

impl PositionBody {
    pub fn into_position(self) -> Result<Position, GameError> {
        let row = self.row.try_into().map_err(|_| GameError::OutOfBounds)?;
        let column = self.column.try_into().map_err(|_| GameError::OutOfBounds)?;
        Ok((row, column))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionBody {
    pub row_begin: u32,
    pub col_begin: u32,
    pub row_end: u32,
    pub col_end: u32,
}

impl SelectionBody {
    /// Corners saturate into `Coord`; the engine clips the rectangle to the
    /// board anyway, so an oversized drag still selects what it covers.
    pub fn into_selection(self) -> SelectionRect {
        let clamp = |value: u32| value.min(u32::from(Coord::MAX)) as Coord;
        SelectionRect {
            row_begin: clamp(self.row_begin),
            col_begin: clamp(self.col_begin),
            row_end: clamp(self.row_end),
            col_end: clamp(self.col_end),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfigBody {
    pub rows: u32,
    pub columns: u32,
    pub mines: u32,
}

impl ConfigBody {
    pub fn into_config(self) -> Result<BoardConfig, GameError> {
        let rows = self.rows.try_into().map_err(|_| GameError::InvalidConfig)?;
        let columns = self
            .columns
            .try_into()
            .map_err(|_| GameError::InvalidConfig)?;
        let mines = self
            .mines
            .try_into()
            .map_err(|_| GameError::InvalidConfig)?;
        BoardConfig::new(rows, columns, mines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cell(state: CellState, is_mine: bool, adjacent_mines: u8, exploded: bool) -> Cell {
        Cell {
            position: (1, 2),
            is_mine,
            adjacent_mines,
            state,
            exploded,
        }
    }

    #[test]
    fn hidden_cells_never_leak_mine_identity() {
        let view = CellView::from(cell(CellState::Hidden, true, 0, false));

        assert!(!view.is_mine);
        assert_eq!(view.adjacent_mines, 0);
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({
                "row": 1,
                "column": 2,
                "state": "hidden",
                "adjacentMines": 0,
                "isMine": false,
                "exploded": false,
            })
        );
    }

    #[test]
    fn flagged_mines_stay_concealed() {
        let view = CellView::from(cell(CellState::Flagged, true, 0, false));

        assert!(!view.is_mine);
        assert_eq!(view.adjacent_mines, 0);
    }

    #[test]
    fn revealed_mines_show_identity_and_explosion() {
        let view = CellView::from(cell(CellState::Revealed, true, 0, true));

        assert!(view.is_mine);
        assert!(view.exploded);
        assert_eq!(view.adjacent_mines, 0);
    }

    #[test]
    fn revealed_safe_cells_show_their_count() {
        let view = CellView::from(cell(CellState::Revealed, false, 3, false));

        assert!(!view.is_mine);
        assert_eq!(view.adjacent_mines, 3);
    }

    #[test]
    fn position_bodies_reject_values_beyond_coordinate_range() {
        let body = PositionBody {
            row: 300,
            column: 0,
        };
        assert_eq!(body.into_position(), Err(GameError::OutOfBounds));

        let body = PositionBody { row: 3, column: 7 };
        assert_eq!(body.into_position(), Ok((3, 7)));
    }

    #[test]
    fn selection_bodies_saturate_instead_of_failing() {
        let body = SelectionBody {
            row_begin: 0,
            col_begin: 0,
            row_end: 100_000,
            col_end: 2,
        };

        let rect = body.into_selection();
        assert_eq!(rect.row_end, Coord::MAX);
        assert_eq!(rect.col_end, 2);
    }

    #[test]
    fn config_bodies_validate_through_board_rules() {
        let body = ConfigBody {
            rows: 9,
            columns: 9,
            mines: 82,
        };
        assert_eq!(body.into_config(), Err(GameError::InvalidConfig));

        let body = ConfigBody {
            rows: 9,
            columns: 9,
            mines: 10,
        };
        assert_eq!(
            body.into_config(),
            Ok(BoardConfig::new_unchecked(9, 9, 10))
        );
    }

    #[test]
    fn selection_bodies_decode_camel_case_fields() {
        let body: SelectionBody = serde_json::from_value(json!({
            "rowBegin": 1,
            "colBegin": 2,
            "rowEnd": 3,
            "colEnd": 4,
        }))
        .unwrap();

        let rect = body.into_selection();
        assert_eq!(rect.row_begin, 1);
        assert_eq!(rect.col_end, 4);
    }
}
