//! Connection and room limits configuration.

use super::defaults::{
    default_events_per_second, default_history_limit, default_max_player_name_len,
    default_max_room_id_len, default_outbound_queue, default_room_queue,
};
use serde::Deserialize;

/// Connection and room limits configuration.
///
/// These bound the work a single client can cause and the memory a slow
/// client can pin.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Matches returned by `get_room_history` (default: 10, at most 10).
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Maximum room id length in characters (default: 64).
    #[serde(default = "default_max_room_id_len")]
    pub max_room_id_len: usize,
    /// Maximum player name length in characters (default: 32).
    #[serde(default = "default_max_player_name_len")]
    pub max_player_name_len: usize,
    /// Inbound events allowed per connection per second (default: 20).
    #[serde(default = "default_events_per_second")]
    pub events_per_second: u32,
    /// Outbound queue capacity per connection (default: 64).
    /// A client that falls this far behind is disconnected.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
    /// Room actor mailbox capacity (default: 128).
    #[serde(default = "default_room_queue")]
    pub room_queue: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            max_room_id_len: default_max_room_id_len(),
            max_player_name_len: default_max_player_name_len(),
            events_per_second: default_events_per_second(),
            outbound_queue: default_outbound_queue(),
            room_queue: default_room_queue(),
        }
    }
}
