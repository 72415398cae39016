//! Match archive configuration.

use super::defaults::{default_archive_backend, default_archive_path};
use serde::Deserialize;

/// Match archive configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Backend type: "sqlite", "redb", "none".
    #[serde(default = "default_archive_backend")]
    pub backend: String,
    /// Path to the archive file (":memory:" for an in-memory SQLite archive).
    #[serde(default = "default_archive_path")]
    pub path: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            backend: default_archive_backend(),
            path: default_archive_path(),
        }
    }
}

/// Parsed archive backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveBackend {
    Sqlite,
    Redb,
    None,
}

impl ArchiveConfig {
    /// The selected backend, or `None` for an unrecognised name.
    pub fn kind(&self) -> Option<ArchiveBackend> {
        match self.backend.to_ascii_lowercase().as_str() {
            "sqlite" => Some(ArchiveBackend::Sqlite),
            "redb" => Some(ArchiveBackend::Redb),
            "none" => Some(ArchiveBackend::None),
            _ => None,
        }
    }
}
