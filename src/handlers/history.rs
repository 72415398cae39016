//! get_room_history handler.

use super::core::{Context, Handler};
use super::normalize_room_id;
use crate::error::HandlerResult;
use crate::telemetry::spans;
use async_trait::async_trait;
use serde_json::Value;
use tictac_proto::{ClientEvent, GetRoomHistory, ServerEvent, decode_payload};
use tracing::warn;

/// Reads the archive directly; no room actor is involved, and the requester
/// need not be in the room.
pub struct HistoryHandler;

#[async_trait]
impl Handler for HistoryHandler {
    async fn handle(&self, ctx: &mut Context<'_>, data: Value) -> HandlerResult {
        let GetRoomHistory { room_id } = decode_payload(ClientEvent::GET_ROOM_HISTORY, data)?;
        let room_id = normalize_room_id(&room_id, ctx.hub.limits.max_room_id_len)?;
        spans::record_room(&room_id);

        let matches = ctx
            .hub
            .archive
            .query_by_room(&room_id, ctx.hub.limits.history_limit)
            .await
            .inspect_err(|e| warn!(room = %room_id, error = %e, "History query failed"))?;

        ctx.reply(ServerEvent::RoomHistory { room_id, matches })
    }
}
