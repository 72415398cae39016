//! Actor Model for Room State Management.
//!
//! Every room is owned by a `RoomActor` running in its own Tokio task. All
//! reads and writes of a room's players and game go through the actor's
//! mailbox, so requests for one room are applied strictly one at a time
//! while different rooms run in parallel.
//!
//! # Architecture
//!
//! - **State Ownership**: The actor owns the `Room` record and each member's outbound sender.
//! - **Message Passing**: Handlers send `RoomEvent`s and await a oneshot reply.
//! - **Ordering**: Broadcasts are queued to members in the order moves are applied.
//! - **Persistence**: Finished matches are handed to a spawned task; the actor never awaits the archive.

use crate::archive::MatchArchive;
use crate::state::{Hub, Room, RoomHandle};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tictac_proto::ServerEvent;
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

mod handlers;
mod types;

pub use types::*;

use super::ConnectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorState {
    Active,
    Draining,
}

/// The Room Actor.
///
/// Owns the state of a single room and processes events sequentially.
pub struct RoomActor {
    room: Room,
    senders: HashMap<ConnectionId, mpsc::Sender<ServerEvent>>,
    instance: Uuid,
    hub: Weak<Hub>,
    archive: Arc<dyn MatchArchive>,
    state: ActorState,
}

impl RoomActor {
    /// Create a new Room Actor and spawn it.
    pub fn spawn(room_id: String, hub: &Arc<Hub>) -> RoomHandle {
        let (tx, rx) = mpsc::channel(hub.limits.room_queue);
        let instance = Uuid::new_v4();
        let span = crate::telemetry::spans::room(&room_id);

        let actor = Self {
            room: Room::new(room_id),
            senders: HashMap::new(),
            instance,
            hub: Arc::downgrade(hub),
            archive: Arc::clone(&hub.archive),
            state: ActorState::Active,
        };

        tokio::spawn(actor.run(rx).instrument(span));

        RoomHandle::new(instance, tx)
    }

    /// The main actor loop.
    pub async fn run(mut self, mut rx: mpsc::Receiver<RoomEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        tracing::trace!(room = %self.room.room_id, "Room actor stopped");
    }

    fn handle_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Join {
                connection_id,
                player_name,
                sender,
                reply_tx,
            } => self.handle_join(connection_id, player_name, sender, reply_tx),
            RoomEvent::Move {
                connection_id,
                index,
                reply_tx,
            } => self.handle_move(connection_id, index, reply_tx),
            RoomEvent::Reset { reply_tx } => self.handle_reset(reply_tx),
            RoomEvent::Leave {
                connection_id,
                reply_tx,
            } => self.handle_leave(connection_id, reply_tx),
            #[cfg(test)]
            RoomEvent::Snapshot { reply_tx } => {
                let _ = reply_tx.send(self.room.clone());
            }
        }
    }

    fn is_draining(&self) -> bool {
        self.state == ActorState::Draining
    }

    fn request_disconnect(&self, conn: ConnectionId, reason: &str) {
        if let Some(hub) = self.hub.upgrade() {
            hub.request_disconnect(conn, reason);
        }
    }

    /// Stop accepting players and drop this room from the registry once the
    /// last player has left.
    fn cleanup_if_empty(&mut self) {
        if self.state == ActorState::Draining || !self.room.players.is_empty() {
            return;
        }

        self.state = ActorState::Draining;
        if let Some(hub) = self.hub.upgrade() {
            hub.rooms
                .remove_if_instance(&self.room.room_id, self.instance);
        }
    }
}
