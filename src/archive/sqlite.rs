//! SQLite-backed match archive.

use super::{ArchiveError, MatchArchive};
use crate::db::Database;
use async_trait::async_trait;
use tictac_proto::MatchRecord;

pub struct SqliteArchive {
    db: Database,
}

impl SqliteArchive {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MatchArchive for SqliteArchive {
    async fn save(&self, record: &MatchRecord) -> Result<(), ArchiveError> {
        self.db.matches().insert(record).await?;
        Ok(())
    }

    async fn query_by_room(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, ArchiveError> {
        Ok(self.db.matches().recent_for_room(room_id, limit).await?)
    }
}
