//! Gateway - WebSocket listener that accepts incoming connections.
//!
//! The Gateway binds the listen socket, performs the WebSocket handshake
//! (with an Origin check), and spawns a Connection task per client.

use crate::config::ListenConfig;
use crate::handlers::Registry;
use crate::network::Connection;
use crate::state::Hub;
use http::StatusCode;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tracing::{Instrument, error, info, warn};

/// The Gateway accepts incoming WebSocket connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    allow_origins: Arc<Vec<String>>,
    hub: Arc<Hub>,
    registry: Arc<Registry>,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(config: &ListenConfig, hub: Arc<Hub>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.address).await?;
        info!(address = %listener.local_addr()?, "WebSocket listener bound");

        Ok(Self {
            listener,
            allow_origins: Arc::new(config.allow_origins.clone()),
            hub,
            registry: Arc::new(Registry::new()),
        })
    }

    /// Run the accept loop forever.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let _ = stream.set_nodelay(true);

                    let hub = Arc::clone(&self.hub);
                    let registry = Arc::clone(&self.registry);
                    let allowed = Arc::clone(&self.allow_origins);
                    let id = hub.next_connection_id();

                    tokio::spawn(
                        async move {
                            let cors_callback = |req: &Request, response: Response| {
                                check_origin(req, response, &allowed, addr)
                            };

                            match accept_hdr_async(stream, cors_callback).await {
                                Ok(ws_stream) => {
                                    info!("Client connected");
                                    let connection = Connection::new(id, addr, ws_stream, hub, registry);
                                    if let Err(e) = connection.run().await {
                                        error!(error = %e, "Connection error");
                                    }
                                    info!("Client disconnected");
                                }
                                Err(e) => {
                                    warn!(error = %e, "WebSocket handshake failed");
                                }
                            }
                        }
                        .instrument(crate::telemetry::spans::connection(id, &addr.to_string())),
                    );
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}

/// Handshake callback: accept when no origins are configured, when the list
/// holds `"*"`, or when the request's Origin is listed.
fn check_origin(
    req: &Request,
    response: Response,
    allowed: &[String],
    addr: SocketAddr,
) -> Result<Response, ErrorResponse> {
    if allowed.is_empty() {
        return Ok(response);
    }

    let origin = req.headers().get("Origin").and_then(|o| o.to_str().ok());
    if let Some(origin) = origin {
        if allowed.iter().any(|a| a == origin || a == "*") {
            return Ok(response);
        }
        warn!(%addr, origin = %origin, "WebSocket origin rejected");
    } else if allowed.iter().any(|a| a == "*") {
        return Ok(response);
    }

    let mut rejection = ErrorResponse::new(Some("Origin not allowed".to_string()));
    *rejection.status_mut() = StatusCode::FORBIDDEN;
    Err(rejection)
}
