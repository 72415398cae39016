//! Match repository for database queries.

use super::DbError;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tictac_proto::{MatchRecord, PlayerInfo, Winner};

/// Repository for finished matches.
pub struct MatchRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MatchRepository<'a> {
    /// Create a new match repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a finished match.
    pub async fn insert(&self, record: &MatchRecord) -> Result<(), DbError> {
        let players = serde_json::to_string(&record.players)
            .map_err(|e| DbError::CorruptRow(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO matches (id, room_id, players, winner, moves, played_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&record.room_id)
        .bind(players)
        .bind(record.winner.as_str())
        .bind(i64::from(record.moves))
        .bind(record.played_at.timestamp_millis())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Most recent matches for a room, newest first.
    pub async fn recent_for_room(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, DbError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, (String, String, String, i64, i64)>(
            r#"
            SELECT room_id, players, winner, moves, played_at
            FROM matches
            WHERE room_id = ?
            ORDER BY played_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(room_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(row_to_record).collect()
    }
}

fn row_to_record(
    (room_id, players, winner, moves, played_at): (String, String, String, i64, i64),
) -> Result<MatchRecord, DbError> {
    let players: Vec<PlayerInfo> =
        serde_json::from_str(&players).map_err(|e| DbError::CorruptRow(e.to_string()))?;
    let winner =
        Winner::parse(&winner).ok_or_else(|| DbError::CorruptRow(format!("winner {winner}")))?;
    let moves = u32::try_from(moves).map_err(|e| DbError::CorruptRow(e.to_string()))?;
    let played_at: DateTime<Utc> = DateTime::from_timestamp_millis(played_at)
        .ok_or_else(|| DbError::CorruptRow(format!("played_at {played_at}")))?;

    Ok(MatchRecord {
        room_id,
        players,
        winner,
        moves,
        played_at,
    })
}
