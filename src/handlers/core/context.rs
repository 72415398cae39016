//! Handler context and per-connection session state.

use crate::error::{HandlerError, HandlerResult};
use crate::state::{ConnectionId, Hub};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tictac_proto::{ServerEvent, Symbol};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Handler context passed to each event handler.
pub struct Context<'a> {
    /// Server-assigned id of the calling connection.
    pub connection_id: ConnectionId,
    /// Shared server state.
    pub hub: &'a Arc<Hub>,
    /// Outbound queue of the calling connection.
    pub sender: &'a mpsc::Sender<ServerEvent>,
    /// What this connection has joined, if anything.
    pub session: &'a mut Session,
}

impl<'a> Context<'a> {
    pub fn new(
        connection_id: ConnectionId,
        hub: &'a Arc<Hub>,
        sender: &'a mpsc::Sender<ServerEvent>,
        session: &'a mut Session,
    ) -> Self {
        Self {
            connection_id,
            hub,
            sender,
            session,
        }
    }

    /// Queue an event for the calling connection only.
    ///
    /// The connection task is the one running this handler, so waiting for
    /// queue space would never finish; a full queue disconnects the client.
    pub fn reply(&self, event: ServerEvent) -> HandlerResult {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                crate::metrics::record_slow_consumer();
                self.hub
                    .request_disconnect(self.connection_id, "outbound queue full");
                Err(HandlerError::Send)
            }
            Err(TrySendError::Closed(_)) => Err(HandlerError::Send),
        }
    }
}

/// The room a connection is seated in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room_id: String,
    pub player_name: String,
    pub symbol: Symbol,
}

/// Per-connection state. At most one binding, set on a successful join and
/// cleared on disconnect.
#[derive(Debug, Default)]
pub struct Session {
    pub binding: Option<Binding>,
}

impl Session {
    pub fn room_id(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.room_id.as_str())
    }
}

/// Handler for one inbound event kind.
///
/// `data` is the raw payload; each handler decodes its own type so a bad
/// payload is reported against the event it arrived with.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, data: Value) -> HandlerResult;
}
