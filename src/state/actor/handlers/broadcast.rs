//! Outbound fan-out to room members.

use crate::state::ConnectionId;
use crate::state::actor::RoomActor;
use tictac_proto::ServerEvent;
use tokio::sync::mpsc::error::TrySendError;

impl RoomActor {
    /// Queue `event` for every seated player, in join order.
    pub(super) fn broadcast(&self, event: &ServerEvent) {
        for player in &self.room.players {
            self.send_to(player.connection_id, event.clone());
        }
    }

    /// Queue `event` for one member.
    ///
    /// Never blocks the room: a member whose queue is full is disconnected
    /// instead of silently missing an event.
    pub(super) fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        let Some(sender) = self.senders.get(&conn) else {
            return;
        };
        if let Err(err) = sender.try_send(event) {
            match err {
                TrySendError::Full(_) => {
                    crate::metrics::record_slow_consumer();
                    self.request_disconnect(conn, "outbound queue full");
                }
                TrySendError::Closed(_) => {}
            }
        }
    }
}
