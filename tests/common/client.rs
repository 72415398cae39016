//! Test WebSocket client.
//!
//! Sends protocol events and asserts on the events the server pushes back.

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tictac_proto::{
    ClientEvent, GetRoomHistory, JoinRoom, MakeMove, ResetGame, ServerEvent, decode_server,
    encode_client,
};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// A test game client.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let (ws, _response) = connect_async(format!("ws://{address}/")).await?;
        Ok(Self { ws })
    }

    /// Send a raw text frame.
    pub async fn send_raw(&mut self, text: &str) -> anyhow::Result<()> {
        self.ws.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Send a binary frame.
    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> anyhow::Result<()> {
        self.ws.send(Message::Binary(bytes)).await?;
        Ok(())
    }

    /// Send a protocol event.
    pub async fn send(&mut self, event: ClientEvent) -> anyhow::Result<()> {
        let text = encode_client(&event)?;
        self.send_raw(&text).await
    }

    pub async fn join(&mut self, room_id: &str, player_name: &str) -> anyhow::Result<()> {
        self.send(ClientEvent::JoinRoom(JoinRoom {
            room_id: room_id.to_string(),
            player_name: player_name.to_string(),
        }))
        .await
    }

    pub async fn make_move(&mut self, room_id: &str, index: i64) -> anyhow::Result<()> {
        self.send(ClientEvent::MakeMove(MakeMove {
            room_id: room_id.to_string(),
            index,
        }))
        .await
    }

    pub async fn reset(&mut self, room_id: &str) -> anyhow::Result<()> {
        self.send(ClientEvent::ResetGame(ResetGame {
            room_id: room_id.to_string(),
        }))
        .await
    }

    pub async fn history(&mut self, room_id: &str) -> anyhow::Result<()> {
        self.send(ClientEvent::GetRoomHistory(GetRoomHistory {
            room_id: room_id.to_string(),
        }))
        .await
    }

    /// Receive a single event from the server.
    pub async fn recv(&mut self) -> anyhow::Result<ServerEvent> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive an event with a timeout. Control frames are skipped.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<ServerEvent> {
        timeout(dur, self.next_event()).await?
    }

    async fn next_event(&mut self) -> anyhow::Result<ServerEvent> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Ok(decode_server(&text)?),
                Some(Ok(Message::Close(_))) | None => anyhow::bail!("connection closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Receive events until the given predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<ServerEvent>>
    where
        F: FnMut(&ServerEvent) -> bool,
    {
        let mut events = Vec::new();
        loop {
            let event = self.recv().await?;
            let done = predicate(&event);
            events.push(event);
            if done {
                return Ok(events);
            }
        }
    }

    /// Receive until an event with the given wire name arrives, returning it.
    pub async fn expect(&mut self, name: &str) -> anyhow::Result<ServerEvent> {
        let mut events = self.recv_until(|e| e.name() == name).await?;
        events
            .pop()
            .ok_or_else(|| anyhow::anyhow!("no {name} received"))
    }

    /// Discard whatever arrives within a short window.
    pub async fn drain(&mut self) {
        while self.recv_timeout(Duration::from_millis(100)).await.is_ok() {}
    }

    /// Close the connection.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}
