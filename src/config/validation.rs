//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::{ArchiveBackend, Config};
use std::path::Path;
use thiserror::Error;

/// Most matches a `room_history` reply may carry.
pub const MAX_HISTORY_LIMIT: usize = 10;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("archive.backend must be one of sqlite, redb, none; got '{0}'")]
    UnknownArchiveBackend(String),
    #[error("archive.path is required for the {0} backend")]
    MissingArchivePath(String),
    #[error("archive.path parent directory does not exist: {0}")]
    ArchivePathInvalid(String),
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
    #[error("limits.history_limit must be at most {max}; got {0}", max = MAX_HISTORY_LIMIT)]
    HistoryLimitTooLarge(usize),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    match config.archive.kind() {
        None => errors.push(ValidationError::UnknownArchiveBackend(
            config.archive.backend.clone(),
        )),
        Some(ArchiveBackend::None) => {}
        Some(_) => {
            let path = &config.archive.path;
            if path.is_empty() {
                errors.push(ValidationError::MissingArchivePath(
                    config.archive.backend.clone(),
                ));
            } else if path != ":memory:"
                && let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                errors.push(ValidationError::ArchivePathInvalid(path.clone()));
            }
        }
    }

    let limits = &config.limits;
    let sizes = [
        ("history_limit", limits.history_limit),
        ("max_room_id_len", limits.max_room_id_len),
        ("max_player_name_len", limits.max_player_name_len),
        ("outbound_queue", limits.outbound_queue),
        ("room_queue", limits.room_queue),
    ];
    for (name, value) in sizes {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
    }
    if limits.history_limit > MAX_HISTORY_LIMIT {
        errors.push(ValidationError::HistoryLimitTooLarge(limits.history_limit));
    }
    if limits.events_per_second == 0 {
        errors.push(ValidationError::ZeroLimit("events_per_second"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
