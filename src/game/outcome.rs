//! Win/draw detection.

use tictac_proto::{Board, Symbol, WIN_LINES, WinLine};

/// First completed line in table order, with the symbol that owns it.
///
/// Only one line can be complete in a well-formed game; for malformed boards
/// the table order decides.
pub fn evaluate(board: &Board) -> Option<(Symbol, WinLine)> {
    WIN_LINES.iter().find_map(|line| {
        let [a, b, c] = line.indices();
        let first = board.get(a)?.symbol()?;
        let owned = |i| board.get(i).and_then(|cell| cell.symbol()) == Some(first);
        (owned(b) && owned(c)).then_some((first, *line))
    })
}

/// True when no cell is empty.
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|cell| !cell.is_empty())
}
