//! Telemetry utilities for event timing and span construction.

use std::time::Instant;

/// Guard for timing event handling and recording metrics.
///
/// Records event latency when dropped.
pub struct EventTimer {
    event: &'static str,
    start: Instant,
}

impl EventTimer {
    /// Start timing an event.
    pub fn new(event: &'static str) -> Self {
        Self {
            event,
            start: Instant::now(),
        }
    }
}

impl Drop for EventTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_event(self.event, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::field::Empty;
    use tracing::{Span, info_span};

    /// Span for a client connection.
    pub fn connection(conn: u64, addr: &str) -> Span {
        info_span!("connection", conn = conn, addr = %addr)
    }

    /// Span for handling one inbound event. `room` is filled in by the
    /// handler once the payload is decoded.
    pub fn event(name: &str, conn: u64) -> Span {
        info_span!("event", name = %name, conn = conn, room = Empty)
    }

    /// Attach the room id to the current event span.
    pub fn record_room(room_id: &str) {
        Span::current().record("room", room_id);
    }

    /// Span for a room actor.
    pub fn room(room_id: &str) -> Span {
        info_span!("room", room = %room_id)
    }
}
