//! JSON text-frame encoding and decoding.

use crate::error::ProtoError;
use crate::event::{ClientEvent, Envelope, ServerEvent};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode an inbound frame.
///
/// The envelope is read first so that a bad payload can still be attributed
/// to the event it was sent with.
pub fn decode_client(raw: &str) -> Result<ClientEvent, ProtoError> {
    let envelope: Envelope = serde_json::from_str(raw).map_err(ProtoError::Malformed)?;
    decode_envelope(envelope)
}

/// Decode an already-parsed envelope into a typed client event.
pub fn decode_envelope(envelope: Envelope) -> Result<ClientEvent, ProtoError> {
    let Envelope { event, data } = envelope;
    match event.as_str() {
        ClientEvent::JOIN_ROOM => decode_payload(event, data).map(ClientEvent::JoinRoom),
        ClientEvent::MAKE_MOVE => decode_payload(event, data).map(ClientEvent::MakeMove),
        ClientEvent::RESET_GAME => decode_payload(event, data).map(ClientEvent::ResetGame),
        ClientEvent::GET_ROOM_HISTORY => decode_payload(event, data).map(ClientEvent::GetRoomHistory),
        _ => Err(ProtoError::UnknownEvent(event)),
    }
}

/// Decode the `data` of an event whose name is already known.
pub fn decode_payload<T: DeserializeOwned>(
    event: impl Into<String>,
    data: Value,
) -> Result<T, ProtoError> {
    serde_json::from_value(data).map_err(|source| ProtoError::Payload {
        event: event.into(),
        source,
    })
}

/// Encode an outbound event as a text frame.
pub fn encode_server(event: &ServerEvent) -> Result<String, ProtoError> {
    serde_json::to_string(event).map_err(ProtoError::Encode)
}

/// Decode an outbound frame (client side).
pub fn decode_server(raw: &str) -> Result<ServerEvent, ProtoError> {
    serde_json::from_str(raw).map_err(ProtoError::Malformed)
}

/// Encode an inbound event (client side).
pub fn encode_client(event: &ClientEvent) -> Result<String, ProtoError> {
    serde_json::to_string(event).map_err(ProtoError::Encode)
}
