//! Game state transitions.

use super::outcome::{evaluate, is_full};
use tictac_proto::{Cell, GameState, Symbol, Winner};

/// State of a game nobody has moved in yet.
pub fn fresh_state() -> GameState {
    GameState::default()
}

/// Apply an already-validated move, returning the next state.
///
/// The input is never modified. The turn only advances while the game is
/// still running.
pub fn apply_move(state: &GameState, index: usize, symbol: Symbol) -> GameState {
    let board = state.board.with(index, Cell::from(symbol));
    let move_count = state.move_count + 1;

    if let Some((owner, line)) = evaluate(&board) {
        return GameState {
            board,
            current_turn: state.current_turn,
            game_over: true,
            winner: Some(Winner::from(owner)),
            winning_line: Some(line),
            move_count,
        };
    }

    if is_full(&board) {
        return GameState {
            board,
            current_turn: state.current_turn,
            game_over: true,
            winner: Some(Winner::Draw),
            winning_line: None,
            move_count,
        };
    }

    GameState {
        board,
        current_turn: symbol.other(),
        game_over: false,
        winner: None,
        winning_line: None,
        move_count,
    }
}
