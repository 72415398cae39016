//! Redb-backed match archive.
//!
//! Records live in a single table keyed `room \0 played_at \0 id`, so a
//! reverse range scan over one room's prefix yields its newest matches
//! first.

use super::{ArchiveError, MatchArchive};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::sync::Arc;
use tictac_proto::MatchRecord;

const MATCHES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("matches");

pub struct RedbArchive {
    db: Arc<Database>,
}

impl RedbArchive {
    pub fn new(path: &str) -> Result<Self, ArchiveError> {
        let db = Database::create(path).map_err(|e| ArchiveError::Database(e.to_string()))?;

        // Create the table up front so reads on a fresh file don't fail.
        let write_txn = db
            .begin_write()
            .map_err(|e| ArchiveError::Database(e.to_string()))?;
        write_txn
            .open_table(MATCHES_TABLE)
            .map_err(|e| ArchiveError::Database(e.to_string()))?;
        write_txn
            .commit()
            .map_err(|e| ArchiveError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn make_key(room_id: &str, nanotime: i64, id: &uuid::Uuid) -> String {
        // Fixed-width timestamp keeps lexicographic order chronological.
        format!("{}\0{:020}\0{}", room_id, nanotime, id)
    }
}

#[async_trait]
impl MatchArchive for RedbArchive {
    async fn save(&self, record: &MatchRecord) -> Result<(), ArchiveError> {
        let nanotime = record.played_at.timestamp_nanos_opt().unwrap_or(0);
        let key = Self::make_key(&record.room_id, nanotime, &uuid::Uuid::new_v4());
        let value =
            serde_json::to_vec(record).map_err(|e| ArchiveError::Serialization(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| ArchiveError::Database(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(MATCHES_TABLE)
                .map_err(|e| ArchiveError::Database(e.to_string()))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(|e| ArchiveError::Database(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| ArchiveError::Database(e.to_string()))?;
        Ok(())
    }

    async fn query_by_room(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, ArchiveError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| ArchiveError::Database(e.to_string()))?;
        let table = read_txn
            .open_table(MATCHES_TABLE)
            .map_err(|e| ArchiveError::Database(e.to_string()))?;

        let start_key = format!("{}\0", room_id);
        let end_key = format!("{}\u{1}", room_id);
        let range = table
            .range(start_key.as_str()..end_key.as_str())
            .map_err(|e| ArchiveError::Database(e.to_string()))?;

        let mut matches = Vec::with_capacity(limit);
        for item in range.rev() {
            if matches.len() >= limit {
                break;
            }
            let (_k, v) = item.map_err(|e| ArchiveError::Database(e.to_string()))?;
            let record: MatchRecord = serde_json::from_slice(v.value())
                .map_err(|e| ArchiveError::Serialization(e.to_string()))?;
            matches.push(record);
        }

        Ok(matches)
    }
}
