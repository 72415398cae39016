//! Resetting a game.

use crate::error::RoomError;
use crate::game::fresh_state;
use crate::state::actor::RoomActor;
use tictac_proto::ServerEvent;
use tokio::sync::oneshot;

impl RoomActor {
    /// Players and `started` are left as they are.
    pub(crate) fn handle_reset(&mut self, reply_tx: oneshot::Sender<Result<(), RoomError>>) {
        if self.is_draining() {
            let _ = reply_tx.send(Err(RoomError::RoomNotFound(self.room.room_id.clone())));
            return;
        }

        self.room.game = fresh_state();
        self.broadcast(&ServerEvent::GameReset {
            game_state: self.room.game.clone(),
        });
        let _ = reply_tx.send(Ok(()));
    }
}
