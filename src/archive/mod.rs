//! Match archive abstraction.
//!
//! Completed games are written once and queried back per room, newest
//! first. The room actor never awaits a write; saves run on their own task.

use async_trait::async_trait;
use thiserror::Error;
use tictac_proto::MatchRecord;

pub mod noop;
pub mod redb;
pub mod sqlite;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<crate::db::DbError> for ArchiveError {
    fn from(err: crate::db::DbError) -> Self {
        ArchiveError::Database(err.to_string())
    }
}

#[async_trait]
pub trait MatchArchive: Send + Sync {
    /// Persist a finished match.
    async fn save(&self, record: &MatchRecord) -> Result<(), ArchiveError>;

    /// Up to `limit` matches played in `room_id`, most recent first.
    async fn query_by_room(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, ArchiveError>;
}
