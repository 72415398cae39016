//! reset_game handler.

use super::core::{Context, Handler};
use super::normalize_room_id;
use crate::error::{HandlerResult, RoomError};
use crate::state::RoomEvent;
use crate::telemetry::spans;
use async_trait::async_trait;
use serde_json::Value;
use tictac_proto::{ClientEvent, ResetGame, decode_payload};
use tracing::debug;

pub struct ResetHandler;

#[async_trait]
impl Handler for ResetHandler {
    async fn handle(&self, ctx: &mut Context<'_>, data: Value) -> HandlerResult {
        let ResetGame { room_id } = decode_payload(ClientEvent::RESET_GAME, data)?;
        let room_id = normalize_room_id(&room_id, ctx.hub.limits.max_room_id_len)?;
        spans::record_room(&room_id);

        let Some(room) = ctx.hub.rooms.get(&room_id) else {
            return Err(RoomError::RoomNotFound(room_id).into());
        };

        room.request(|reply_tx| RoomEvent::Reset { reply_tx })
            .await
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))??;

        debug!(conn = ctx.connection_id, room = %room_id, "Game reset");
        Ok(())
    }
}
