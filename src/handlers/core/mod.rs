//! Core handler infrastructure.
//!
//! The handler context, the per-connection session, and the registry that
//! dispatches inbound events to their handlers.

pub mod context;
pub mod registry;

pub use context::{Binding, Context, Handler, Session};
pub use registry::Registry;
