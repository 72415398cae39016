//! # tictac-proto
//!
//! Wire vocabulary for the tictacd room protocol: board and game-state
//! types, match records, and the JSON event envelopes exchanged over a
//! WebSocket text frame.
//!
//! ## Frame format
//!
//! Every frame is a JSON object with an `event` name and an optional
//! `data` payload:
//!
//! ```rust
//! use tictac_proto::{decode_client, ClientEvent};
//!
//! let raw = r#"{"event":"join_room","data":{"roomId":"r1","playerName":"Alice"}}"#;
//! match decode_client(raw).unwrap() {
//!     ClientEvent::JoinRoom(join) => assert_eq!(join.player_name, "Alice"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! Outbound events are encoded with [`encode_server`]:
//!
//! ```rust
//! use tictac_proto::{encode_server, ServerEvent};
//!
//! let text = encode_server(&ServerEvent::waiting("Waiting for an opponent")).unwrap();
//! assert!(text.starts_with(r#"{"event":"waiting_for_opponent""#));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod board;
pub mod codec;
pub mod error;
pub mod event;
pub mod game;

pub use self::board::{Board, Cell, Symbol, WinLine, BOARD_CELLS, WIN_LINES};
pub use self::codec::{
    decode_client, decode_envelope, decode_payload, decode_server, encode_client, encode_server,
};
pub use self::error::ProtoError;
pub use self::event::{
    ClientEvent, Envelope, ErrorPayload, GetRoomHistory, JoinRoom, MakeMove, ResetGame,
    ServerEvent,
};
pub use self::game::{GameState, LastMove, MatchRecord, PlayerInfo, Winner};
