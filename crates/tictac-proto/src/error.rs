//! Codec errors.

use thiserror::Error;

/// Failure to turn a text frame into an event.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// The frame is not a JSON object with an `event` field.
    #[error("malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The event name is not part of the protocol.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// The event is known but its `data` does not match the expected shape.
    #[error("invalid payload for {event}: {source}")]
    Payload {
        /// Event whose payload failed to decode.
        event: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A binary frame arrived; the protocol is text only.
    #[error("binary frames are not supported")]
    Binary,

    /// An event could not be serialized.
    #[error("failed to encode event: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProtoError {
    /// Event name carried by the frame, when it could be read.
    pub fn event_name(&self) -> Option<&str> {
        match self {
            ProtoError::Malformed(_) => None,
            ProtoError::UnknownEvent(name) => Some(name),
            ProtoError::Payload { event, .. } => Some(event),
            ProtoError::Binary | ProtoError::Encode(_) => None,
        }
    }
}
