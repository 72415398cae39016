//! join_room handler.

use super::core::{Binding, Context, Handler};
use super::{normalize_field, normalize_room_id};
use crate::error::{HandlerResult, RoomError};
use crate::state::RoomEvent;
use crate::telemetry::spans;
use async_trait::async_trait;
use serde_json::Value;
use tictac_proto::{ClientEvent, JoinRoom, decode_payload};
use tracing::{debug, info};

pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &mut Context<'_>, data: Value) -> HandlerResult {
        let JoinRoom {
            room_id,
            player_name,
        } = decode_payload(ClientEvent::JOIN_ROOM, data)?;

        if let Some(bound) = ctx.session.room_id() {
            return Err(RoomError::AlreadyInRoom(bound.to_string()).into());
        }

        let limits = &ctx.hub.limits;
        let room_id = normalize_room_id(&room_id, limits.max_room_id_len)?;
        let player_name = normalize_field(&player_name, limits.max_player_name_len)
            .ok_or(RoomError::InvalidPlayerName(limits.max_player_name_len))?;
        spans::record_room(&room_id);

        let connection_id = ctx.connection_id;
        let mut attempt = 0;

        loop {
            let room = ctx.hub.room(&room_id);
            let sender = ctx.sender.clone();
            let name = player_name.clone();

            let reply = room
                .request(|reply_tx| RoomEvent::Join {
                    connection_id,
                    player_name: name,
                    sender,
                    reply_tx,
                })
                .await;

            match reply {
                Some(Ok(symbol)) => {
                    info!(conn = connection_id, room = %room_id, player = %player_name, %symbol, "Joined room");
                    ctx.session.binding = Some(Binding {
                        room_id,
                        player_name,
                        symbol,
                    });
                    return Ok(());
                }
                // The room emptied out or its actor died between lookup and
                // send. A fresh lookup creates a new room.
                Some(Err(RoomError::Closing)) | None if attempt == 0 => {
                    debug!(room = %room_id, "Room went away during join, retrying");
                    attempt += 1;
                }
                Some(Err(e)) => return Err(e.into()),
                None => return Err(RoomError::Unavailable.into()),
            }
        }
    }
}
