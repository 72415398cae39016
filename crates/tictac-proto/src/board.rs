//! Board, cell and symbol types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells on the 3x3 board.
pub const BOARD_CELLS: usize = 9;

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// First player to join a room; always moves first.
    X,
    /// Second player to join a room.
    O,
}

impl Symbol {
    /// The opposing symbol.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    /// Wire representation (`"X"` / `"O"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::X => "X",
            Symbol::O => "O",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of a single board cell. Empty cells travel as `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No mark yet.
    #[default]
    #[serde(rename = "")]
    Empty,
    /// Marked by X.
    X,
    /// Marked by O.
    O,
}

impl Cell {
    /// The symbol occupying this cell, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Symbol::X),
            Cell::O => Some(Symbol::O),
        }
    }

    /// True when no symbol occupies the cell.
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Symbol> for Cell {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Cell::X,
            Symbol::O => Cell::O,
        }
    }
}

/// Row-major 3x3 board, indices 0 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([Cell; BOARD_CELLS]);

impl Board {
    /// An all-empty board.
    pub const fn empty() -> Self {
        Board([Cell::Empty; BOARD_CELLS])
    }

    /// Cell at `index`, or `None` when the index is off the board.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.0.get(index).copied()
    }

    /// Returns a copy of this board with `index` set to `cell`.
    ///
    /// Out-of-range indices leave the copy unchanged.
    #[must_use]
    pub fn with(&self, index: usize, cell: Cell) -> Self {
        let mut next = *self;
        if let Some(slot) = next.0.get_mut(index) {
            *slot = cell;
        }
        next
    }

    /// All cells in index order.
    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.0
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.0.iter().filter(|c| !c.is_empty()).count()
    }
}

impl From<[Cell; BOARD_CELLS]> for Board {
    fn from(cells: [Cell; BOARD_CELLS]) -> Self {
        Board(cells)
    }
}

/// Three board indices forming a row, column or diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinLine(pub [usize; 3]);

impl WinLine {
    /// Indices of the line.
    pub fn indices(&self) -> [usize; 3] {
        self.0
    }
}

/// The eight winning lines: rows, then columns, then diagonals.
pub const WIN_LINES: [WinLine; 8] = [
    WinLine([0, 1, 2]),
    WinLine([3, 4, 5]),
    WinLine([6, 7, 8]),
    WinLine([0, 3, 6]),
    WinLine([1, 4, 7]),
    WinLine([2, 5, 8]),
    WinLine([0, 4, 8]),
    WinLine([2, 4, 6]),
];
