//! State management module.
//!
//! Contains the Hub (shared server state), the room registry, and the
//! per-room actors that own each room's players and game.

pub mod actor;
mod hub;
mod registry;
mod room;

pub use actor::RoomEvent;
pub use hub::Hub;
pub use registry::RoomHandle;
pub use room::{ConnectionId, Player, Room};
