//! Inbound and outbound event payloads.
//!
//! Event names are the wire contract; field names inside `data` are
//! camelCase.

use crate::board::Symbol;
use crate::game::{GameState, LastMove, MatchRecord, PlayerInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw frame: an event name plus an untyped payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name, e.g. `join_room`.
    pub event: String,
    /// Payload object; `null` when the frame carried none.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

/// `join_room` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoom {
    /// Room to join or create.
    pub room_id: String,
    /// Display name for this player.
    pub player_name: String,
}

/// `make_move` payload.
///
/// `index` is signed so that out-of-range requests still decode and can be
/// rejected by move validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeMove {
    /// Room the move applies to.
    pub room_id: String,
    /// Target cell.
    pub index: i64,
}

/// `reset_game` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetGame {
    /// Room to reset.
    pub room_id: String,
}

/// `get_room_history` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRoomHistory {
    /// Room whose finished matches are requested.
    pub room_id: String,
}

/// Events sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join (or create) a room.
    JoinRoom(JoinRoom),
    /// Place a mark.
    MakeMove(MakeMove),
    /// Start the room's game over.
    ResetGame(ResetGame),
    /// Ask for recent finished matches of a room.
    GetRoomHistory(GetRoomHistory),
}

impl ClientEvent {
    /// Wire name of `join_room`.
    pub const JOIN_ROOM: &'static str = "join_room";
    /// Wire name of `make_move`.
    pub const MAKE_MOVE: &'static str = "make_move";
    /// Wire name of `reset_game`.
    pub const RESET_GAME: &'static str = "reset_game";
    /// Wire name of `get_room_history`.
    pub const GET_ROOM_HISTORY: &'static str = "get_room_history";

    /// Every inbound event name.
    pub const NAMES: [&'static str; 4] = [
        Self::JOIN_ROOM,
        Self::MAKE_MOVE,
        Self::RESET_GAME,
        Self::GET_ROOM_HISTORY,
    ];

    /// The static wire name matching `name`, if it is an inbound event.
    pub fn known(name: &str) -> Option<&'static str> {
        Self::NAMES.into_iter().find(|known| *known == name)
    }

    /// Wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinRoom(_) => Self::JOIN_ROOM,
            ClientEvent::MakeMove(_) => Self::MAKE_MOVE,
            ClientEvent::ResetGame(_) => Self::RESET_GAME,
            ClientEvent::GetRoomHistory(_) => Self::GET_ROOM_HISTORY,
        }
    }

    /// Room the event targets.
    pub fn room_id(&self) -> &str {
        match self {
            ClientEvent::JoinRoom(p) => &p.room_id,
            ClientEvent::MakeMove(p) => &p.room_id,
            ClientEvent::ResetGame(p) => &p.room_id,
            ClientEvent::GetRoomHistory(p) => &p.room_id,
        }
    }
}

/// `room_error` / `move_error` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable reason.
    pub message: String,
    /// Stable snake_case identifier.
    pub code: String,
}

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// Sent to a player whose join succeeded.
    RoomJoined {
        /// Joined room.
        room_id: String,
        /// Mark assigned to the joiner.
        symbol: Symbol,
        /// Name the joiner registered with.
        player_name: String,
        /// Everyone in the room, in join order.
        players: Vec<PlayerInfo>,
    },
    /// Sent to a lone player after joining.
    WaitingForOpponent {
        /// Status text.
        message: String,
    },
    /// Join/reset/history failure, sent to the requester only.
    RoomError(ErrorPayload),
    /// Broadcast when the second player arrives.
    GameStart {
        /// Both players in join order.
        players: Vec<PlayerInfo>,
        /// Fresh game state.
        game_state: GameState,
    },
    /// Move rejection, sent to the mover only.
    MoveError(ErrorPayload),
    /// Broadcast after every applied move.
    GameUpdate {
        /// State after the move.
        game_state: GameState,
        /// The move just applied.
        last_move: LastMove,
    },
    /// Broadcast after a reset.
    GameReset {
        /// Fresh game state.
        game_state: GameState,
    },
    /// Broadcast to the players left behind after a disconnect.
    PlayerDisconnected {
        /// Status text.
        message: String,
    },
    /// Reply to `get_room_history`.
    RoomHistory {
        /// Room queried.
        room_id: String,
        /// Most recent matches first.
        matches: Vec<MatchRecord>,
    },
}

impl ServerEvent {
    /// `waiting_for_opponent` with the given text.
    pub fn waiting(message: impl Into<String>) -> Self {
        ServerEvent::WaitingForOpponent {
            message: message.into(),
        }
    }

    /// `room_error` with a code and message.
    pub fn room_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerEvent::RoomError(ErrorPayload {
            message: message.into(),
            code: code.into(),
        })
    }

    /// `move_error` with a code and message.
    pub fn move_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerEvent::MoveError(ErrorPayload {
            message: message.into(),
            code: code.into(),
        })
    }

    /// Wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::RoomJoined { .. } => "room_joined",
            ServerEvent::WaitingForOpponent { .. } => "waiting_for_opponent",
            ServerEvent::RoomError(_) => "room_error",
            ServerEvent::GameStart { .. } => "game_start",
            ServerEvent::MoveError(_) => "move_error",
            ServerEvent::GameUpdate { .. } => "game_update",
            ServerEvent::GameReset { .. } => "game_reset",
            ServerEvent::PlayerDisconnected { .. } => "player_disconnected",
            ServerEvent::RoomHistory { .. } => "room_history",
        }
    }
}
