//! Rate limiting for flood protection.
//!
//! Uses the `governor` crate's token bucket algorithm. Each connection gets
//! its own limiter, created on first use and dropped on disconnect.

use crate::state::ConnectionId;
use dashmap::DashMap;
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;
use tracing::debug;

/// Type alias for governor's direct rate limiter.
type DirectRateLimiter = governor::DefaultDirectRateLimiter;

const FALLBACK_EVENTS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(20) {
    Some(rate) => rate,
    None => NonZeroU32::MIN,
};

/// Thread-safe rate limit manager using governor.
#[derive(Debug)]
pub struct RateLimitManager {
    /// Per-connection inbound event limiters.
    event_limiters: DashMap<ConnectionId, DirectRateLimiter>,
    /// Sustained events per second; also the burst size.
    events_per_second: NonZeroU32,
}

impl RateLimitManager {
    /// Create a new rate limit manager.
    pub fn new(events_per_second: u32) -> Self {
        Self {
            event_limiters: DashMap::new(),
            events_per_second: NonZeroU32::new(events_per_second)
                .unwrap_or(FALLBACK_EVENTS_PER_SECOND),
        }
    }

    /// Check if a connection may submit another event.
    ///
    /// Returns `true` if allowed, `false` if rate limited.
    pub fn check_event_rate(&self, conn: ConnectionId) -> bool {
        let limiter = self
            .event_limiters
            .entry(conn)
            .or_insert_with(|| GovRateLimiter::direct(Quota::per_second(self.events_per_second)));

        let allowed = limiter.check().is_ok();
        if !allowed {
            debug!(conn, "event rate limit exceeded");
        }
        allowed
    }

    /// Remove a connection's limiter (on disconnect).
    pub fn remove_client(&self, conn: ConnectionId) {
        self.event_limiters.remove(&conn);
    }

    /// Number of tracked connections.
    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.event_limiters.len()
    }
}
