//! Room record.

use crate::game::fresh_state;
use tictac_proto::{GameState, PlayerInfo, Symbol};

/// Server-assigned connection identifier. Never sent to clients.
pub type ConnectionId = u64;

/// Maximum players per room.
pub const ROOM_CAPACITY: usize = 2;

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub connection_id: ConnectionId,
    pub name: String,
    pub symbol: Symbol,
}

impl Player {
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            name: self.name.clone(),
            symbol: self.symbol,
        }
    }
}

/// One room: up to two players in join order, their game, and whether the
/// game has started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub room_id: String,
    pub players: Vec<Player>,
    pub game: GameState,
    pub started: bool,
}

impl Room {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            players: Vec::with_capacity(ROOM_CAPACITY),
            game: fresh_state(),
            started: false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= ROOM_CAPACITY
    }

    pub fn player(&self, connection_id: ConnectionId) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| p.connection_id == connection_id)
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    /// Symbol for the next joiner: X for an empty room, otherwise whichever
    /// symbol the seated player does not hold.
    pub fn next_symbol(&self) -> Symbol {
        self.players
            .first()
            .map_or(Symbol::X, |seated| seated.symbol.other())
    }

    pub fn player_infos(&self) -> Vec<PlayerInfo> {
        self.players.iter().map(Player::info).collect()
    }
}
