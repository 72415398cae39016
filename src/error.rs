//! Unified error handling for tictacd.
//!
//! Every error carries a stable code used both on the wire and as a metric
//! label, and maps to exactly one outbound error event.

use crate::archive::ArchiveError;
use crate::game::MoveRejection;
use thiserror::Error;
use tictac_proto::{ClientEvent, ProtoError, ServerEvent};

// ============================================================================
// Room Errors (join / reset / actor lifecycle)
// ============================================================================

/// Room-level failures, surfaced as `room_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Room is full")]
    RoomFull,

    #[error("Name {0} is already taken in this room")]
    NameTaken(String),

    #[error("Room {0} not found")]
    RoomNotFound(String),

    #[error("Already in room {0}")]
    AlreadyInRoom(String),

    #[error("Room id must be 1 to {0} characters")]
    InvalidRoomId(usize),

    #[error("Player name must be 1 to {0} characters")]
    InvalidPlayerName(usize),

    /// The room's actor is draining; the caller should retry on a fresh room.
    #[error("room is closing")]
    Closing,

    /// The room's actor is gone.
    #[error("room is unavailable")]
    Unavailable,
}

impl RoomError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RoomFull => "room_full",
            Self::NameTaken(_) => "name_taken",
            Self::RoomNotFound(_) => "room_not_found",
            Self::AlreadyInRoom(_) => "already_in_room",
            Self::InvalidRoomId(_) | Self::InvalidPlayerName(_) => "invalid_request",
            Self::Closing | Self::Unavailable => "internal_error",
        }
    }
}

// ============================================================================
// Move Errors
// ============================================================================

/// Move failures, surfaced as `move_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Game has not started")]
    NotStarted,

    #[error("Game is already over")]
    GameOver,

    #[error("Player not found in this room")]
    PlayerNotFound,

    #[error(transparent)]
    Rejected(#[from] MoveRejection),
}

impl MoveError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RoomNotFound => "room_not_found",
            Self::NotStarted => "not_started",
            Self::GameOver => "game_over",
            Self::PlayerNotFound => "player_not_found",
            Self::Rejected(reason) => reason.error_code(),
        }
    }
}

// ============================================================================
// Handler Errors (event processing)
// ============================================================================

/// Errors that can occur while handling an inbound event.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("invalid request: {0}")]
    Proto(#[from] ProtoError),

    #[error("rate limited")]
    RateLimited,

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// The connection's outbound queue is closed; nobody is left to tell.
    #[error("send error: connection closed")]
    Send,

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for the wire and metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Room(e) => e.error_code(),
            Self::Move(e) => e.error_code(),
            Self::Proto(ProtoError::UnknownEvent(_)) => "unknown_event",
            Self::Proto(_) => "invalid_request",
            Self::RateLimited => "rate_limited",
            Self::Archive(_) => "archive_unavailable",
            Self::Send => "send_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Convert to the error event sent back to the originating connection.
    ///
    /// `event` is the inbound event name; failures of `make_move` become
    /// `move_error`, everything else `room_error`. Returns `None` when the
    /// connection can no longer be reached.
    pub fn to_event(&self, event: &str) -> Option<ServerEvent> {
        let message = match self {
            Self::Send => return None,
            Self::Room(RoomError::Closing | RoomError::Unavailable) | Self::Internal(_) => {
                "Something went wrong, please try again".to_string()
            }
            Self::Proto(ProtoError::UnknownEvent(name)) => format!("Unknown event: {name}"),
            Self::Proto(_) => "Invalid request".to_string(),
            Self::RateLimited => "Too many requests, slow down".to_string(),
            Self::Archive(_) => "Match history is unavailable".to_string(),
            Self::Room(e) => e.to_string(),
            Self::Move(e) => e.to_string(),
        };

        let code = self.error_code();
        if matches!(self, Self::Move(_)) || event == ClientEvent::MAKE_MOVE {
            Some(ServerEvent::move_error(code, message))
        } else {
            Some(ServerEvent::room_error(code, message))
        }
    }
}

/// Result type for event handlers.
pub type HandlerResult = Result<(), HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tictac_proto::ErrorPayload;

    fn payload(event: ServerEvent) -> (&'static str, ErrorPayload) {
        match event {
            ServerEvent::RoomError(p) => ("room_error", p),
            ServerEvent::MoveError(p) => ("move_error", p),
            other => panic!("not an error event: {other:?}"),
        }
    }

    #[test]
    fn move_rejections_keep_their_reason() {
        let err = HandlerError::from(MoveError::from(MoveRejection::CellOccupied));
        let (kind, p) = payload(err.to_event("make_move").unwrap());
        assert_eq!(kind, "move_error");
        assert_eq!(p.code, "cell_occupied");
        assert_eq!(p.message, "Cell already occupied");
    }

    #[test]
    fn room_errors_go_to_room_error() {
        let err = HandlerError::from(RoomError::RoomFull);
        let (kind, p) = payload(err.to_event("join_room").unwrap());
        assert_eq!(kind, "room_error");
        assert_eq!(p.code, "room_full");
    }

    #[test]
    fn internal_faults_are_generic() {
        let err = HandlerError::Internal("actor panicked at foo.rs:12".into());
        let (kind, p) = payload(err.to_event("join_room").unwrap());
        assert_eq!(kind, "room_error");
        assert_eq!(p.code, "internal_error");
        assert!(!p.message.contains("foo.rs"));

        let (kind, _) = payload(err.to_event("make_move").unwrap());
        assert_eq!(kind, "move_error");
    }

    #[test]
    fn bad_move_payload_is_a_move_error() {
        let proto = tictac_proto::decode_client(r#"{"event":"make_move","data":{}}"#).unwrap_err();
        let err = HandlerError::from(proto);
        let (kind, p) = payload(err.to_event("make_move").unwrap());
        assert_eq!(kind, "move_error");
        assert_eq!(p.code, "invalid_request");
    }

    #[test]
    fn closed_connection_gets_nothing() {
        assert!(HandlerError::Send.to_event("join_room").is_none());
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(HandlerError::RateLimited.error_code(), "rate_limited");
        assert_eq!(
            HandlerError::from(MoveError::NotStarted).error_code(),
            "not_started"
        );
        assert_eq!(
            HandlerError::from(ProtoError::UnknownEvent("x".into())).error_code(),
            "unknown_event"
        );
    }
}
