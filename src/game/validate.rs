//! Move legality.

use thiserror::Error;
use tictac_proto::{Board, Symbol};

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Cell already occupied")]
    CellOccupied,
    #[error("Invalid cell index")]
    InvalidIndex,
}

impl MoveRejection {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotYourTurn => "not_your_turn",
            Self::CellOccupied => "cell_occupied",
            Self::InvalidIndex => "invalid_index",
        }
    }
}

/// Check a move and return the board index it targets.
///
/// Checks run in a fixed order and the first failure is reported: turn,
/// then occupancy, then range.
pub fn validate(
    board: &Board,
    current_turn: Symbol,
    actor: Symbol,
    index: i64,
) -> Result<usize, MoveRejection> {
    if actor != current_turn {
        return Err(MoveRejection::NotYourTurn);
    }

    let cell = usize::try_from(index)
        .ok()
        .and_then(|i| board.get(i).map(|cell| (i, cell)));

    match cell {
        Some((_, cell)) if !cell.is_empty() => Err(MoveRejection::CellOccupied),
        Some((i, _)) => Ok(i),
        None => Err(MoveRejection::InvalidIndex),
    }
}
