//! Pure game rules: outcome evaluation, move validation and the
//! apply/reset transitions.
//!
//! Nothing in here touches rooms, connections or I/O; the room actor calls
//! these functions while it holds exclusive access to a room.

mod machine;
mod outcome;
mod validate;

pub use machine::{apply_move, fresh_state};
pub use validate::{MoveRejection, validate};
