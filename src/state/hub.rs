//! The Hub: shared server state handed to every connection.

use super::actor::RoomActor;
use super::registry::{RoomHandle, RoomRegistry};
use super::room::ConnectionId;
use crate::archive::MatchArchive;
use crate::config::LimitsConfig;
use crate::security::RateLimitManager;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;
use tracing::warn;

/// Shared state: live rooms, the match archive, and per-connection
/// bookkeeping.
pub struct Hub {
    pub rooms: RoomRegistry,
    pub archive: Arc<dyn MatchArchive>,
    pub rate_limiter: RateLimitManager,
    pub limits: LimitsConfig,
    /// Wakes a connection task that must be dropped.
    kill_switches: DashMap<ConnectionId, Arc<Notify>>,
    next_connection: AtomicU64,
}

impl Hub {
    pub fn new(archive: Arc<dyn MatchArchive>, limits: LimitsConfig) -> Self {
        Self {
            rooms: RoomRegistry::new(),
            archive,
            rate_limiter: RateLimitManager::new(limits.events_per_second),
            limits,
            kill_switches: DashMap::new(),
            next_connection: AtomicU64::new(1),
        }
    }

    pub fn next_connection_id(&self) -> ConnectionId {
        self.next_connection.fetch_add(1, Ordering::Relaxed)
    }

    /// Live room for `room_id`, spawning its actor on first use.
    pub fn room(self: &Arc<Self>, room_id: &str) -> RoomHandle {
        self.rooms
            .get_or_create(room_id, || RoomActor::spawn(room_id.to_string(), self))
    }

    /// Register a connection and return the signal that asks it to close.
    pub fn register_connection(&self, conn: ConnectionId) -> Arc<Notify> {
        let kill = Arc::new(Notify::new());
        self.kill_switches.insert(conn, Arc::clone(&kill));
        kill
    }

    pub fn unregister_connection(&self, conn: ConnectionId) {
        self.kill_switches.remove(&conn);
        self.rate_limiter.remove_client(conn);
    }

    /// Ask a connection task to close. Safe to call from a room actor.
    pub fn request_disconnect(&self, conn: ConnectionId, reason: &str) {
        if let Some(kill) = self.kill_switches.get(&conn) {
            warn!(conn, %reason, "Disconnecting client");
            kill.notify_one();
        }
    }
}
