//! Session coordinator: inbound event handlers.
//!
//! Each connection owns a [`Session`] and feeds decoded envelopes through the
//! [`Registry`]. Handlers validate the request, then hand it to the room's
//! actor, which does all reading and writing of room state.

mod core;
mod disconnect;
mod history;
mod join;
mod moves;
mod reset;

pub use self::core::{Context, Registry, Session};
pub use disconnect::handle_disconnect;

use crate::error::RoomError;

/// Trim `raw` and check it is 1 to `max_len` characters with no control
/// characters.
pub(crate) fn normalize_field(raw: &str, max_len: usize) -> Option<String> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    (len > 0 && len <= max_len && !trimmed.chars().any(char::is_control))
        .then(|| trimmed.to_string())
}

/// Room ids are compared after trimming, so `" r1"` and `"r1"` are one room.
pub(crate) fn normalize_room_id(raw: &str, max_len: usize) -> Result<String, RoomError> {
    normalize_field(raw, max_len).ok_or(RoomError::InvalidRoomId(max_len))
}
