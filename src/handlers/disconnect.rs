//! Implicit disconnect.

use super::core::Session;
use crate::state::{ConnectionId, Hub, RoomEvent};
use std::sync::Arc;
use tracing::info;

/// Release the connection's seat, if it has one.
///
/// Takes the binding out of the session first, so a second call is a no-op.
pub async fn handle_disconnect(hub: &Arc<Hub>, connection_id: ConnectionId, session: &mut Session) {
    let Some(binding) = session.binding.take() else {
        return;
    };

    let Some(room) = hub.rooms.get(&binding.room_id) else {
        return;
    };

    let remaining = room
        .request(|reply_tx| RoomEvent::Leave {
            connection_id,
            reply_tx: Some(reply_tx),
        })
        .await;

    info!(
        conn = connection_id,
        room = %binding.room_id,
        player = %binding.player_name,
        remaining = ?remaining,
        "Left room"
    );
}
