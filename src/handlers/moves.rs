//! make_move handler.

use super::core::{Context, Handler};
use super::normalize_room_id;
use crate::error::{HandlerResult, MoveError};
use crate::state::RoomEvent;
use crate::telemetry::spans;
use async_trait::async_trait;
use serde_json::Value;
use tictac_proto::{ClientEvent, MakeMove, decode_payload};

pub struct MoveHandler;

#[async_trait]
impl Handler for MoveHandler {
    async fn handle(&self, ctx: &mut Context<'_>, data: Value) -> HandlerResult {
        let MakeMove { room_id, index } = decode_payload(ClientEvent::MAKE_MOVE, data)?;
        let room_id = normalize_room_id(&room_id, ctx.hub.limits.max_room_id_len)?;
        spans::record_room(&room_id);

        // Never creates a room.
        let room = ctx.hub.rooms.get(&room_id).ok_or(MoveError::RoomNotFound)?;
        let connection_id = ctx.connection_id;

        room.request(|reply_tx| RoomEvent::Move {
            connection_id,
            index,
            reply_tx,
        })
        .await
        .ok_or(MoveError::RoomNotFound)??;

        Ok(())
    }
}
