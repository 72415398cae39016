use crate::error::{MoveError, RoomError};
use crate::state::ConnectionId;
use tictac_proto::{ServerEvent, Symbol};
use tokio::sync::{mpsc, oneshot};

/// Events that can be sent to a Room Actor.
#[derive(Debug)]
pub enum RoomEvent {
    /// Player taking a seat.
    Join {
        connection_id: ConnectionId,
        player_name: String,
        sender: mpsc::Sender<ServerEvent>,
        /// Assigned symbol on success.
        reply_tx: oneshot::Sender<Result<Symbol, RoomError>>,
    },
    /// Player marking a cell.
    Move {
        connection_id: ConnectionId,
        index: i64,
        reply_tx: oneshot::Sender<Result<(), MoveError>>,
    },
    /// Start the game over with the same players.
    Reset {
        reply_tx: oneshot::Sender<Result<(), RoomError>>,
    },
    /// Connection went away. Replies with the number of players left.
    Leave {
        connection_id: ConnectionId,
        reply_tx: Option<oneshot::Sender<usize>>,
    },
    /// Copy of the room record.
    #[cfg(test)]
    Snapshot {
        reply_tx: oneshot::Sender<crate::state::Room>,
    },
}
