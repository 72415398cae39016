//! Removing a departed connection.

use crate::game::fresh_state;
use crate::state::ConnectionId;
use crate::state::actor::RoomActor;
use tictac_proto::ServerEvent;
use tokio::sync::oneshot;
use tracing::debug;

impl RoomActor {
    /// Unknown connections are ignored, so a repeated leave is a no-op.
    pub(crate) fn handle_leave(
        &mut self,
        connection_id: ConnectionId,
        reply_tx: Option<oneshot::Sender<usize>>,
    ) {
        if let Some(pos) = self
            .room
            .players
            .iter()
            .position(|p| p.connection_id == connection_id)
        {
            let departed = self.room.players.remove(pos);
            self.senders.remove(&connection_id);
            debug!(conn = connection_id, player = %departed.name, "Player left");

            self.broadcast(&ServerEvent::PlayerDisconnected {
                message: format!("{} left the game", departed.name),
            });

            if self.room.players.is_empty() {
                self.cleanup_if_empty();
            } else {
                // The remaining player waits for a new opponent and a fresh game.
                self.room.started = false;
                self.room.game = fresh_state();
            }
        }

        if let Some(tx) = reply_tx {
            let _ = tx.send(self.room.players.len());
        }
    }
}
