use serde::{Deserialize, Serialize};

use crate::{
    Board, BoardConfig, Cell, CellCount, Coord, Position, Result, detect_certain_mines,
};

/// Session-level game state. Once `Victory` or `Defeat` is reached the game
/// is terminal until the next reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Victory,
    Defeat,
}

impl GameStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Playing
    }
}

/// Inclusive cell rectangle from a drag selection; corners may arrive in any
/// order and may reach past the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub row_begin: Coord,
    pub col_begin: Coord,
    pub row_end: Coord,
    pub col_end: Coord,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealResult {
    pub updated_cells: Vec<Cell>,
    pub hit_mine: bool,
    pub victory: bool,
    pub flags_remaining: CellCount,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlagResult {
    pub updated_cell: Cell,
    pub flags_remaining: CellCount,
    pub victory: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AutoMarkResult {
    pub flagged_cells: Vec<Cell>,
    pub flags_remaining: CellCount,
    pub victory: bool,
}

/// Read-only projection of the whole session; cells are copied row-major so
/// callers cannot alias engine-owned state.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardSnapshot {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
    pub flags_remaining: CellCount,
    pub status: GameStatus,
    pub cells: Vec<Cell>,
}

/// One playable session: a board plus flag and status bookkeeping. Not
/// internally synchronized; callers serialize access.
pub struct GameEngine {
    board: Board,
    current_config: BoardConfig,
    flags_remaining: CellCount,
    game_over: bool,
    status: GameStatus,
}

impl GameEngine {
    /// Builds a session over a freshly generated board.
    pub fn new(config: BoardConfig) -> Result<Self> {
        config.validate()?;
        let board = Board::new(config.rows, config.columns, config.mines)?;
        Ok(Self::with_board(board))
    }

    /// Wraps an existing board, taking its dimensions as the session config.
    /// The usual way to run deterministic layouts.
    pub fn with_board(board: Board) -> Self {
        let current_config =
            BoardConfig::new_unchecked(board.rows(), board.columns(), board.mine_count());
        let flags_remaining = board.mine_count();
        Self {
            board,
            current_config,
            flags_remaining,
            game_over: false,
            status: GameStatus::Playing,
        }
    }

    pub const fn status(&self) -> GameStatus {
        self.status
    }

    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub const fn flags_remaining(&self) -> CellCount {
        self.flags_remaining
    }

    pub const fn current_config(&self) -> BoardConfig {
        self.current_config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Reveals a cell, expanding zero regions and settling the game state.
    /// Both game endings uncover the remaining mines, exploded on defeat.
    pub fn reveal_cell(&mut self, position: Position) -> Result<RevealResult> {
        if self.game_over {
            return Ok(self.echo_reveal());
        }

        // The very first reveal of a board never ends the game: a mine under
        // the cursor is relocated before the board is touched.
        if self.board.revealed_safe_cells() == 0 && self.board.cell_at(position)?.state.is_hidden()
        {
            self.board.ensure_safe_cell(position)?;
        }

        let outcome = self.board.reveal(position)?;
        let mut updated_cells = outcome.revealed_cells;

        if outcome.hit_mine {
            self.finish(GameStatus::Defeat);
            updated_cells.extend(self.board.reveal_remaining_mines(true));
        } else if self.board.all_safe_cells_revealed() {
            self.finish(GameStatus::Victory);
            updated_cells.extend(self.board.reveal_remaining_mines(false));
        }

        Ok(RevealResult {
            updated_cells,
            hit_mine: outcome.hit_mine,
            victory: matches!(self.status, GameStatus::Victory),
            flags_remaining: self.flags_remaining,
        })
    }

    /// Toggles a flag, enforcing the flag budget.
    pub fn toggle_flag(&mut self, position: Position) -> Result<FlagResult> {
        let current = self.board.cell_at(position)?;

        if self.game_over {
            return Ok(self.flag_result(current));
        }

        if current.state.is_hidden() && self.flags_remaining == 0 {
            // Budget exhausted; the cell stays as it is.
            return Ok(self.flag_result(current));
        }

        let was_flagged = current.state.is_flagged();
        let outcome = self.board.toggle_flag(position)?;

        if outcome.flag_added {
            self.flags_remaining = self.flags_remaining.saturating_sub(1);
        } else if was_flagged && self.flags_remaining < self.current_config.mines {
            self.flags_remaining += 1;
        }

        Ok(self.flag_result(outcome.updated_cell))
    }

    /// Runs the certain-mine deduction over a selection and flags the finds
    /// in deduction order until the flag budget runs out. `None` means the
    /// board did not change.
    pub fn auto_mark(&mut self, selection: SelectionRect) -> Option<AutoMarkResult> {
        if self.game_over {
            return None;
        }

        let candidates = self.selection_candidates(selection);
        if candidates.is_empty() {
            return None;
        }

        let certain = detect_certain_mines(&self.board, &candidates)?;

        let mut flagged_cells = Vec::with_capacity(certain.len());
        for position in certain {
            let Ok(cell) = self.board.cell_at(position) else {
                continue;
            };
            if !cell.state.is_hidden() {
                continue;
            }
            if self.flags_remaining == 0 {
                break;
            }
            let Ok(outcome) = self.board.toggle_flag(position) else {
                continue;
            };
            if outcome.flag_added {
                self.flags_remaining -= 1;
                flagged_cells.push(outcome.updated_cell);
            }
        }

        if flagged_cells.is_empty() {
            return None;
        }

        if self.board.all_safe_cells_revealed() {
            self.finish(GameStatus::Victory);
            flagged_cells.extend(self.board.reveal_remaining_mines(false));
        }

        Some(AutoMarkResult {
            flagged_cells,
            flags_remaining: self.flags_remaining,
            victory: matches!(self.status, GameStatus::Victory),
        })
    }

    /// Read-only copy of the whole board.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            rows: self.board.rows(),
            columns: self.board.columns(),
            mines: self.board.mine_count(),
            flags_remaining: self.flags_remaining,
            status: self.status,
            cells: self.board.cells().iter().copied().collect(),
        }
    }

    /// Replaces the board wholesale; the previous game simply ceases to
    /// exist. Without a config the last one is reused.
    pub fn reset(&mut self, config: Option<BoardConfig>) -> Result<()> {
        let next = config.unwrap_or(self.current_config);
        next.validate()?;

        self.board = Board::new(next.rows, next.columns, next.mines)?;
        self.current_config = next;
        self.flags_remaining = next.mines;
        self.status = GameStatus::Playing;
        self.game_over = false;
        Ok(())
    }

    fn selection_candidates(&self, selection: SelectionRect) -> Vec<Position> {
        let row_begin = selection.row_begin.min(selection.row_end);
        let col_begin = selection.col_begin.min(selection.col_end);
        let row_end = selection
            .row_begin
            .max(selection.row_end)
            .min(self.board.rows() - 1);
        let col_end = selection
            .col_begin
            .max(selection.col_end)
            .min(self.board.columns() - 1);

        let mut candidates = Vec::new();
        for row in row_begin..=row_end {
            for col in col_begin..=col_end {
                candidates.push((row, col));
            }
        }
        candidates
    }

    fn echo_reveal(&self) -> RevealResult {
        RevealResult {
            updated_cells: Vec::new(),
            hit_mine: matches!(self.status, GameStatus::Defeat),
            victory: matches!(self.status, GameStatus::Victory),
            flags_remaining: self.flags_remaining,
        }
    }

    fn flag_result(&self, updated_cell: Cell) -> FlagResult {
        FlagResult {
            updated_cell,
            flags_remaining: self.flags_remaining,
            victory: matches!(self.status, GameStatus::Victory),
        }
    }

    fn finish(&mut self, status: GameStatus) {
        self.status = status;
        self.game_over = true;
        log::info!("game finished: {status:?}");
    }
}
