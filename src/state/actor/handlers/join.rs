//! Seating players.

use crate::error::RoomError;
use crate::state::actor::RoomActor;
use crate::state::{ConnectionId, Player};
use tictac_proto::{ServerEvent, Symbol};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

impl RoomActor {
    pub(crate) fn handle_join(
        &mut self,
        connection_id: ConnectionId,
        player_name: String,
        sender: mpsc::Sender<ServerEvent>,
        reply_tx: oneshot::Sender<Result<Symbol, RoomError>>,
    ) {
        if self.is_draining() {
            let _ = reply_tx.send(Err(RoomError::Closing));
            return;
        }
        if self.room.is_full() {
            let _ = reply_tx.send(Err(RoomError::RoomFull));
            return;
        }
        if self.room.has_name(&player_name) {
            let _ = reply_tx.send(Err(RoomError::NameTaken(player_name)));
            return;
        }

        let symbol = self.room.next_symbol();
        self.room.players.push(Player {
            connection_id,
            name: player_name.clone(),
            symbol,
        });
        self.senders.insert(connection_id, sender);
        debug!(conn = connection_id, player = %player_name, %symbol, "Player seated");

        self.send_to(
            connection_id,
            ServerEvent::RoomJoined {
                room_id: self.room.room_id.clone(),
                symbol,
                player_name,
                players: self.room.player_infos(),
            },
        );

        if self.room.is_full() {
            self.room.started = true;
            self.broadcast(&ServerEvent::GameStart {
                players: self.room.player_infos(),
                game_state: self.room.game.clone(),
            });
        } else {
            self.send_to(
                connection_id,
                ServerEvent::waiting("Waiting for an opponent to join..."),
            );
        }

        let _ = reply_tx.send(Ok(symbol));
    }
}
