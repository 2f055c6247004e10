use std::collections::BTreeSet;

use crate::{Board, Position};

/// Positions that are provably mines given the revealed numbers among
/// `candidates`: whenever a clue's unflagged remainder equals its hidden
/// neighbor count, every hidden neighbor must hold a mine. This is the local
/// single-cell rule only; overlapping clues are never combined.
///
/// The result is de-duplicated in insertion order. Returns `None` when no
/// deduction survives.
pub fn detect_certain_mines(board: &Board, candidates: &[Position]) -> Option<Vec<Position>> {
    let mut seen = BTreeSet::new();
    let mut certain = Vec::new();

    for &candidate in candidates {
        let Ok(cell) = board.cell_at(candidate) else {
            continue;
        };
        if !cell.state.is_revealed() || cell.adjacent_mines == 0 {
            continue;
        }

        let neighbors = board.neighbors(candidate);
        let hidden: Vec<Position> = neighbors
            .iter()
            .filter(|neighbor| neighbor.state.is_hidden())
            .map(|neighbor| neighbor.position)
            .collect();
        if hidden.is_empty() {
            continue;
        }

        let flagged = neighbors
            .iter()
            .filter(|neighbor| neighbor.state.is_flagged())
            .count();
        let remaining = i16::from(cell.adjacent_mines) - flagged as i16;
        if remaining <= 0 || remaining as usize != hidden.len() {
            continue;
        }

        for position in hidden {
            if seen.insert(position) {
                certain.push(position);
            }
        }
    }

    if certain.is_empty() { None } else { Some(certain) }
}
