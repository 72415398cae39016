//! No-op archive used when match history is disabled.

use super::{ArchiveError, MatchArchive};
use async_trait::async_trait;
use tictac_proto::MatchRecord;

pub struct NoOpArchive;

#[async_trait]
impl MatchArchive for NoOpArchive {
    async fn save(&self, _record: &MatchRecord) -> Result<(), ArchiveError> {
        Ok(())
    }

    async fn query_by_room(
        &self,
        _room_id: &str,
        _limit: usize,
    ) -> Result<Vec<MatchRecord>, ArchiveError> {
        Ok(Vec::new())
    }
}
