//! Game state, player and match-record payloads.

use crate::board::{Board, Symbol, WinLine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    /// X completed a line.
    X,
    /// O completed a line.
    O,
    /// Board filled with no completed line.
    Draw,
}

impl Winner {
    /// Label used in logs, metrics and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Winner::X => "X",
            Winner::O => "O",
            Winner::Draw => "Draw",
        }
    }

    /// Parse the storage label produced by [`Winner::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "X" => Some(Winner::X),
            "O" => Some(Winner::O),
            "Draw" => Some(Winner::Draw),
            _ => None,
        }
    }
}

impl From<Symbol> for Winner {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Winner::X,
            Symbol::O => Winner::O,
        }
    }
}

/// One game's board, turn and outcome.
///
/// `Default` is the fresh state: empty board, X to move, no outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Cells in row-major order.
    pub board: Board,
    /// Symbol allowed to move next.
    pub current_turn: Symbol,
    /// True once the game reached a win or a draw.
    pub game_over: bool,
    /// Outcome, set only when `game_over` is true.
    pub winner: Option<Winner>,
    /// Completed line for a win.
    pub winning_line: Option<WinLine>,
    /// Number of occupied cells.
    pub move_count: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: Board::empty(),
            current_turn: Symbol::X,
            game_over: false,
            winner: None,
            winning_line: None,
            move_count: 0,
        }
    }
}

/// A player as seen by other clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Display name, unique within a room.
    pub name: String,
    /// Assigned mark.
    pub symbol: Symbol,
}

/// The move carried alongside a `game_update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMove {
    /// Cell that was marked.
    pub index: usize,
    /// Mark placed.
    pub symbol: Symbol,
    /// Name of the mover.
    pub player_name: String,
}

/// Durable summary of one completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Room the game was played in.
    pub room_id: String,
    /// Both players in join order.
    pub players: Vec<PlayerInfo>,
    /// Outcome.
    pub winner: Winner,
    /// Number of moves played.
    pub moves: u32,
    /// When the final move was applied.
    pub played_at: DateTime<Utc>,
}
