//! Applying moves.

use crate::error::MoveError;
use crate::game::{apply_move, validate};
use crate::state::ConnectionId;
use crate::state::actor::RoomActor;
use chrono::Utc;
use std::sync::Arc;
use tictac_proto::{LastMove, MatchRecord, ServerEvent, Winner};
use tokio::sync::oneshot;
use tracing::{info, warn};

impl RoomActor {
    pub(crate) fn handle_move(
        &mut self,
        connection_id: ConnectionId,
        index: i64,
        reply_tx: oneshot::Sender<Result<(), MoveError>>,
    ) {
        let _ = reply_tx.send(self.try_move(connection_id, index));
    }

    /// Every failed check ends the request; nothing after it runs.
    fn try_move(&mut self, connection_id: ConnectionId, index: i64) -> Result<(), MoveError> {
        if self.is_draining() {
            return Err(MoveError::RoomNotFound);
        }
        if !self.room.started {
            return Err(MoveError::NotStarted);
        }
        if self.room.game.game_over {
            return Err(MoveError::GameOver);
        }
        let player = self
            .room
            .player(connection_id)
            .cloned()
            .ok_or(MoveError::PlayerNotFound)?;

        let game = &self.room.game;
        let cell = validate(&game.board, game.current_turn, player.symbol, index)?;
        let next = apply_move(game, cell, player.symbol);
        self.room.game = next.clone();

        self.broadcast(&ServerEvent::GameUpdate {
            game_state: next,
            last_move: LastMove {
                index: cell,
                symbol: player.symbol,
                player_name: player.name,
            },
        });

        if let Some(winner) = self.room.game.winner {
            self.archive_match(winner);
        }
        Ok(())
    }

    /// Hand the finished match to the archive without waiting for it.
    fn archive_match(&self, winner: Winner) {
        let record = MatchRecord {
            room_id: self.room.room_id.clone(),
            players: self.room.player_infos(),
            winner,
            moves: self.room.game.move_count,
            played_at: Utc::now(),
        };
        info!(
            room = %record.room_id,
            winner = winner.as_str(),
            moves = record.moves,
            "Match finished"
        );
        crate::metrics::record_match(winner.as_str());

        let archive = Arc::clone(&self.archive);
        tokio::spawn(async move {
            if let Err(e) = archive.save(&record).await {
                warn!(room = %record.room_id, error = %e, "Failed to archive match");
                crate::metrics::record_archive_failure();
            }
        });
    }
}
