//! Connection - one task per WebSocket client.
//!
//! Reads text frames, dispatches them through the handler registry, and
//! writes the client's outbound queue back to the socket. Room actors push
//! into the outbound queue directly; this task is the only writer to the
//! socket.

use crate::error::HandlerError;
use crate::handlers::{Context, Registry, Session, handle_disconnect};
use crate::state::{ConnectionId, Hub};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tictac_proto::{ClientEvent, Envelope, ProtoError, ServerEvent, encode_server};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

/// A connected client.
pub struct Connection {
    id: ConnectionId,
    addr: SocketAddr,
    ws: WebSocketStream<TcpStream>,
    hub: Arc<Hub>,
    registry: Arc<Registry>,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        addr: SocketAddr,
        ws: WebSocketStream<TcpStream>,
        hub: Arc<Hub>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            id,
            addr,
            ws,
            hub,
            registry,
        }
    }

    /// Run the connection until the client goes away or is dropped, then
    /// release its seat.
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            id,
            addr,
            ws,
            hub,
            registry,
        } = self;

        let (tx, mut rx) = mpsc::channel::<ServerEvent>(hub.limits.outbound_queue);
        let kill = hub.register_connection(id);
        crate::metrics::client_connected();

        let (mut sink, mut stream) = ws.split();
        let mut session = Session::default();
        let frames = Frames {
            id,
            hub: &hub,
            registry: &registry,
            tx: &tx,
        };

        let result = async {
            loop {
                tokio::select! {
                    frame = stream.next() => match frame {
                        Some(Ok(Message::Text(text))) => frames.text(&text, &mut session).await,
                        Some(Ok(Message::Binary(_))) => {
                            if frames.admit() {
                                frames.reject("binary", HandlerError::Proto(ProtoError::Binary));
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            debug!(%addr, error = %e, "Read error");
                            break;
                        }
                    },
                    Some(event) = rx.recv() => {
                        let text = encode_server(&event)?;
                        sink.send(Message::Text(text)).await?;
                    }
                    _ = kill.notified() => {
                        warn!(%addr, "Dropping connection");
                        break;
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        }
        .await;

        handle_disconnect(&hub, id, &mut session).await;
        hub.unregister_connection(id);
        crate::metrics::client_disconnected();
        let _ = sink.close().await;

        result
    }
}

/// Inbound frame processing for one connection.
struct Frames<'a> {
    id: ConnectionId,
    hub: &'a Arc<Hub>,
    registry: &'a Registry,
    tx: &'a mpsc::Sender<ServerEvent>,
}

impl Frames<'_> {
    /// Every inbound data frame spends a token, decodable or not.
    fn admit(&self) -> bool {
        if self.hub.rate_limiter.check_event_rate(self.id) {
            return true;
        }
        crate::metrics::record_rate_limited();
        self.reject("unknown", HandlerError::RateLimited);
        false
    }

    async fn text(&self, text: &str, session: &mut Session) {
        if !self.admit() {
            return;
        }

        let envelope: Envelope = match serde_json::from_str(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                self.reject("malformed", ProtoError::Malformed(e).into());
                return;
            }
        };

        let event = envelope.event.clone();
        let mut ctx = Context::new(self.id, self.hub, self.tx, session);
        if let Err(e) = self.registry.dispatch(&mut ctx, envelope).await {
            self.reply_error(&event, &e);
        }
    }

    /// Errors raised before dispatch are counted here; dispatch counts its own.
    fn reject(&self, event: &str, err: HandlerError) {
        let label = ClientEvent::known(event).unwrap_or("unknown");
        crate::metrics::record_event_error(label, err.error_code());
        debug!(conn = self.id, event, error = %err, "Frame rejected");
        self.reply_error(event, &err);
    }

    fn reply_error(&self, event: &str, err: &HandlerError) {
        let Some(reply) = err.to_event(event) else {
            return;
        };
        if let Err(TrySendError::Full(_)) = self.tx.try_send(reply) {
            crate::metrics::record_slow_consumer();
            self.hub.request_disconnect(self.id, "outbound queue full");
        }
    }
}
