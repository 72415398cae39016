//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig)
//! - [`listen`]: WebSocket listener configuration (ListenConfig)
//! - [`archive`]: Match archive configuration (ArchiveConfig)
//! - [`limits`]: Per-connection and per-room limits (LimitsConfig)
//! - [`validation`]: Startup checks over a loaded config

mod archive;
mod defaults;
mod limits;
mod listen;
mod types;
pub mod validation;

pub use archive::{ArchiveBackend, ArchiveConfig};
pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::{Config, ConfigError, ServerConfig};
