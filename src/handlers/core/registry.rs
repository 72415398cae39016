//! Event handler registry and dispatch.
//!
//! The `Registry` maps inbound event names to handlers and wraps every
//! invocation in a tracing span, a latency timer, and a panic guard.

use super::context::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    history::HistoryHandler, join::JoinHandler, moves::MoveHandler, reset::ResetHandler,
};
use crate::telemetry::{EventTimer, spans};
use futures_util::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tictac_proto::{ClientEvent, Envelope, ProtoError};
use tracing::{Instrument, debug, error};

/// Registry of event handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();
        handlers.insert(ClientEvent::JOIN_ROOM, Box::new(JoinHandler));
        handlers.insert(ClientEvent::MAKE_MOVE, Box::new(MoveHandler));
        handlers.insert(ClientEvent::RESET_GAME, Box::new(ResetHandler));
        handlers.insert(ClientEvent::GET_ROOM_HISTORY, Box::new(HistoryHandler));
        Self { handlers }
    }

    #[cfg(test)]
    fn insert(&mut self, name: &'static str, handler: Box<dyn Handler>) {
        self.handlers.insert(name, handler);
    }

    /// Dispatch an envelope to the handler for its event name.
    ///
    /// A panic inside a handler is caught here and reported as an internal
    /// error; the connection and every room stay up.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, envelope: Envelope) -> HandlerResult {
        let Envelope { event, data } = envelope;

        let Some((&name, handler)) = self.handlers.get_key_value(event.as_str()) else {
            crate::metrics::record_event_error("unknown", "unknown_event");
            debug!(conn = ctx.connection_id, event = %event, "Unknown event");
            return Err(ProtoError::UnknownEvent(event).into());
        };

        let span = spans::event(name, ctx.connection_id);
        let _timer = EventTimer::new(name);

        let result = AssertUnwindSafe(handler.handle(ctx, data))
            .catch_unwind()
            .instrument(span)
            .await
            .unwrap_or_else(|panic| {
                let reason = panic_message(panic.as_ref());
                error!(event = name, conn = ctx.connection_id, %reason, "Handler panicked");
                Err(HandlerError::Internal(reason))
            });

        if let Err(ref e) = result {
            crate::metrics::record_event_error(name, e.error_code());
            debug!(event = name, conn = ctx.connection_id, error = %e, "Event rejected");
        }

        result
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::noop::NoOpArchive;
    use crate::archive::{ArchiveError, MatchArchive};
    use crate::config::LimitsConfig;
    use crate::error::{MoveError, RoomError};
    use crate::handlers::{Session, handle_disconnect};
    use crate::state::{Hub, RoomEvent};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tictac_proto::{MatchRecord, ServerEvent, Symbol};
    use tokio::sync::mpsc;

    struct Conn {
        id: u64,
        tx: mpsc::Sender<ServerEvent>,
        rx: mpsc::Receiver<ServerEvent>,
        session: Session,
    }

    impl Conn {
        fn new(id: u64) -> Self {
            let (tx, rx) = mpsc::channel(32);
            Self {
                id,
                tx,
                rx,
                session: Session::default(),
            }
        }

        async fn send(&mut self, registry: &Registry, hub: &Arc<Hub>, event: &str, data: Value) -> HandlerResult {
            let mut ctx = Context::new(self.id, hub, &self.tx, &mut self.session);
            registry
                .dispatch(
                    &mut ctx,
                    Envelope {
                        event: event.to_string(),
                        data,
                    },
                )
                .await
        }

        fn events(&mut self) -> Vec<&'static str> {
            let mut names = Vec::new();
            while let Ok(event) = self.rx.try_recv() {
                names.push(event.name());
            }
            names
        }
    }

    fn hub_with(archive: Arc<dyn MatchArchive>) -> Arc<Hub> {
        Arc::new(Hub::new(archive, LimitsConfig::default()))
    }

    fn hub() -> Arc<Hub> {
        hub_with(Arc::new(NoOpArchive))
    }

    fn join(room: &str, name: &str) -> Value {
        json!({"roomId": room, "playerName": name})
    }

    #[tokio::test]
    async fn join_binds_the_session() {
        let (registry, hub) = (Registry::new(), hub());
        let mut alice = Conn::new(1);

        alice
            .send(&registry, &hub, "join_room", join("  r1 ", "Alice"))
            .await
            .unwrap();

        let binding = alice.session.binding.clone().unwrap();
        assert_eq!(binding.room_id, "r1");
        assert_eq!(binding.symbol, Symbol::X);
        assert_eq!(alice.events(), ["room_joined", "waiting_for_opponent"]);
        assert!(hub.rooms.contains("r1"));
    }

    #[tokio::test]
    async fn second_join_from_same_connection_is_rejected() {
        let (registry, hub) = (Registry::new(), hub());
        let mut alice = Conn::new(1);
        alice
            .send(&registry, &hub, "join_room", join("r1", "Alice"))
            .await
            .unwrap();

        let err = alice
            .send(&registry, &hub, "join_room", join("r2", "Alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Room(RoomError::AlreadyInRoom(ref r)) if r == "r1"));
        assert_eq!(alice.session.room_id(), Some("r1"));
        assert!(!hub.rooms.contains("r2"));
    }

    #[tokio::test]
    async fn join_rejects_blank_and_oversized_fields() {
        let (registry, hub) = (Registry::new(), hub());
        let mut conn = Conn::new(1);

        for data in [
            join("   ", "Alice"),
            join("r1", ""),
            join(&"r".repeat(65), "Alice"),
            join("r1", &"n".repeat(33)),
            join("r1", "Al\nice"),
        ] {
            let err = conn.send(&registry, &hub, "join_room", data).await.unwrap_err();
            assert_eq!(err.error_code(), "invalid_request");
        }
        assert!(conn.session.binding.is_none());
        assert!(hub.rooms.is_empty());
    }

    #[tokio::test]
    async fn bad_payload_is_an_invalid_request() {
        let (registry, hub) = (Registry::new(), hub());
        let mut conn = Conn::new(1);

        let err = conn
            .send(&registry, &hub, "make_move", json!({"roomId": "r1", "index": "four"}))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Proto(ProtoError::Payload { .. })));
        assert!(matches!(
            err.to_event("make_move"),
            Some(ServerEvent::MoveError(_))
        ));
    }

    #[tokio::test]
    async fn unknown_event_is_reported() {
        let (registry, hub) = (Registry::new(), hub());
        let mut conn = Conn::new(1);

        let err = conn
            .send(&registry, &hub, "spectate", Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "unknown_event");
    }

    #[tokio::test]
    async fn move_and_reset_need_an_existing_room() {
        let (registry, hub) = (Registry::new(), hub());
        let mut conn = Conn::new(1);

        let err = conn
            .send(&registry, &hub, "make_move", json!({"roomId": "nope", "index": 0}))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Move(MoveError::RoomNotFound)));

        let err = conn
            .send(&registry, &hub, "reset_game", json!({"roomId": "nope"}))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Room(RoomError::RoomNotFound(_))));
        assert!(hub.rooms.is_empty());
    }

    #[tokio::test]
    async fn full_game_through_dispatch() {
        let (registry, hub) = (Registry::new(), hub());
        let mut alice = Conn::new(1);
        let mut bob = Conn::new(2);

        alice
            .send(&registry, &hub, "join_room", join("r1", "Alice"))
            .await
            .unwrap();
        bob.send(&registry, &hub, "join_room", join("r1", "Bob"))
            .await
            .unwrap();
        assert_eq!(bob.session.binding.as_ref().unwrap().symbol, Symbol::O);

        let err = bob
            .send(&registry, &hub, "make_move", json!({"roomId": "r1", "index": 0}))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "not_your_turn");

        for (conn, index) in [(1, 0), (2, 3), (1, 1), (2, 4), (1, 2)] {
            let player = if conn == 1 { &mut alice } else { &mut bob };
            player
                .send(&registry, &hub, "make_move", json!({"roomId": "r1", "index": index}))
                .await
                .unwrap();
        }

        let events = bob.events();
        assert_eq!(events.first(), Some(&"room_joined"));
        assert_eq!(events.iter().filter(|e| **e == "game_update").count(), 5);

        // Anyone may reset, even a connection that never joined.
        let mut stranger = Conn::new(3);
        stranger
            .send(&registry, &hub, "reset_game", json!({"roomId": "r1"}))
            .await
            .unwrap();
        assert_eq!(bob.events(), ["game_reset"]);
        assert!(stranger.events().is_empty());
    }

    #[tokio::test]
    async fn history_goes_to_requester_only() {
        let (registry, hub) = (Registry::new(), hub());
        let mut conn = Conn::new(1);

        conn.send(&registry, &hub, "get_room_history", json!({"roomId": "r1"}))
            .await
            .unwrap();
        match conn.rx.try_recv().unwrap() {
            ServerEvent::RoomHistory { room_id, matches } => {
                assert_eq!(room_id, "r1");
                assert!(matches.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    struct BrokenArchive;

    #[async_trait]
    impl MatchArchive for BrokenArchive {
        async fn save(&self, _: &MatchRecord) -> Result<(), ArchiveError> {
            Err(ArchiveError::Database("gone".into()))
        }

        async fn query_by_room(&self, _: &str, _: usize) -> Result<Vec<MatchRecord>, ArchiveError> {
            Err(ArchiveError::Database("gone".into()))
        }
    }

    #[tokio::test]
    async fn history_failure_is_archive_unavailable() {
        let (registry, hub) = (Registry::new(), hub_with(Arc::new(BrokenArchive)));
        let mut conn = Conn::new(1);

        let err = conn
            .send(&registry, &hub, "get_room_history", json!({"roomId": "r1"}))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "archive_unavailable");
        assert!(conn.events().is_empty());
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let (registry, hub) = (Registry::new(), hub());
        let mut alice = Conn::new(1);
        let mut bob = Conn::new(2);
        alice
            .send(&registry, &hub, "join_room", join("r1", "Alice"))
            .await
            .unwrap();
        bob.send(&registry, &hub, "join_room", join("r1", "Bob"))
            .await
            .unwrap();
        bob.events();

        handle_disconnect(&hub, alice.id, &mut alice.session).await;
        handle_disconnect(&hub, alice.id, &mut alice.session).await;

        assert!(alice.session.binding.is_none());
        assert_eq!(bob.events(), ["player_disconnected"]);

        handle_disconnect(&hub, bob.id, &mut bob.session).await;
        assert!(!hub.rooms.contains("r1"));
    }

    #[tokio::test]
    async fn join_after_room_emptied_gets_fresh_room() {
        let (registry, hub) = (Registry::new(), hub());

        // Seat and remove a player so the first actor drains.
        let stale = hub.room("r1");
        let (tx, _rx) = mpsc::channel(4);
        stale
            .request(|reply_tx| RoomEvent::Join {
                connection_id: 9,
                player_name: "Ghost".into(),
                sender: tx,
                reply_tx,
            })
            .await
            .unwrap()
            .unwrap();
        stale
            .request(|reply_tx| RoomEvent::Leave {
                connection_id: 9,
                reply_tx: Some(reply_tx),
            })
            .await
            .unwrap();

        let mut alice = Conn::new(1);
        alice
            .send(&registry, &hub, "join_room", join("r1", "Alice"))
            .await
            .unwrap();
        assert_eq!(alice.session.room_id(), Some("r1"));
        assert_ne!(hub.rooms.get("r1").unwrap().instance, stale.instance);
    }

    struct PanicHandler;

    #[async_trait]
    impl Handler for PanicHandler {
        async fn handle(&self, _ctx: &mut Context<'_>, _data: Value) -> HandlerResult {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn handler_panic_becomes_internal_error() {
        let mut registry = Registry::new();
        registry.insert("explode", Box::new(PanicHandler));
        let hub = hub();
        let mut conn = Conn::new(1);

        let err = conn
            .send(&registry, &hub, "explode", Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Internal(ref reason) if reason == "boom"));
        assert_eq!(err.error_code(), "internal_error");
    }
}
