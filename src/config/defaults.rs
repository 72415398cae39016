//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "tictacd".to_string()
}

// =============================================================================
// Archive Defaults
// =============================================================================

pub fn default_archive_backend() -> String {
    "sqlite".to_string()
}

pub fn default_archive_path() -> String {
    "matches.db".to_string()
}

// =============================================================================
// Limit Defaults
// =============================================================================

pub fn default_history_limit() -> usize {
    10
}

pub fn default_max_room_id_len() -> usize {
    64
}

pub fn default_max_player_name_len() -> usize {
    32
}

pub fn default_events_per_second() -> u32 {
    20
}

pub fn default_outbound_queue() -> usize {
    64
}

pub fn default_room_queue() -> usize {
    128
}
