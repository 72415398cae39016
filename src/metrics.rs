//! Prometheus metrics collection for tictacd.
//!
//! Exposed on the `/metrics` HTTP endpoint when `server.metrics_port` is set.
//!
//! - `tictac_event_total{event}` - Inbound events processed by name
//! - `tictac_event_duration_seconds{event}` - Event latency histogram
//! - `tictac_event_errors_total{event, error}` - Failed events by error code
//! - `tictac_matches_completed_total{winner}` - Finished games by outcome

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Inbound events rejected by the per-connection rate limiter.
pub static RATE_LIMITED: OnceLock<IntCounter> = OnceLock::new();

/// Match records that failed to reach the archive.
pub static ARCHIVE_FAILURES: OnceLock<IntCounter> = OnceLock::new();

/// Connections dropped because their outbound queue filled up.
pub static SLOW_CONSUMERS: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// Gauges (can increase/decrease)
// ========================================================================

/// Currently connected clients.
pub static CONNECTED_CLIENTS: OnceLock<IntGauge> = OnceLock::new();

/// Rooms with a live actor.
pub static ACTIVE_ROOMS: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Protocol metrics
// ========================================================================

/// Events processed by name.
pub static EVENT_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Event processing latency by name.
pub static EVENT_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Event errors by name and error code.
pub static EVENT_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Completed matches by outcome.
pub static MATCHES_COMPLETED: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics and register them with the global registry.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(RATE_LIMITED, IntCounter::new("tictac_rate_limited_total", "Events rejected by rate limiting"));
    register!(ARCHIVE_FAILURES, IntCounter::new("tictac_archive_failures_total", "Match records that failed to persist"));
    register!(SLOW_CONSUMERS, IntCounter::new("tictac_slow_consumers_total", "Connections dropped for a full outbound queue"));
    register!(CONNECTED_CLIENTS, IntGauge::new("tictac_connected_clients", "Currently connected clients"));
    register!(ACTIVE_ROOMS, IntGauge::new("tictac_active_rooms", "Rooms with a live actor"));

    register!(EVENT_COUNTER, IntCounterVec::new(Opts::new("tictac_event_total", "Inbound events processed by name"), &["event"]));
    register!(EVENT_LATENCY, HistogramVec::new(
        HistogramOpts::new("tictac_event_duration_seconds", "Inbound event latency by name")
            .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["event"]));
    register!(EVENT_ERRORS, IntCounterVec::new(Opts::new("tictac_event_errors_total", "Inbound event errors by code"), &["event", "error"]));
    register!(MATCHES_COMPLETED, IntCounterVec::new(Opts::new("tictac_matches_completed_total", "Completed matches by outcome"), &["winner"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

// Metrics stay unset when the endpoint is disabled, so every helper is a
// no-op until `init` has run.

fn get_counter(metric: &OnceLock<IntCounter>) -> Option<&IntCounter> {
    metric.get()
}

fn get_gauge(metric: &OnceLock<IntGauge>) -> Option<&IntGauge> {
    metric.get()
}

fn get_counter_vec(metric: &OnceLock<IntCounterVec>) -> Option<&IntCounterVec> {
    metric.get()
}

fn get_histogram_vec(metric: &OnceLock<HistogramVec>) -> Option<&HistogramVec> {
    metric.get()
}

/// Record an event execution with latency.
#[inline]
pub fn record_event(event: &str, duration_secs: f64) {
    if let Some(c) = get_counter_vec(&EVENT_COUNTER) {
        c.with_label_values(&[event]).inc();
    }
    if let Some(h) = get_histogram_vec(&EVENT_LATENCY) {
        h.with_label_values(&[event]).observe(duration_secs);
    }
}

/// Record an event error.
#[inline]
pub fn record_event_error(event: &str, error: &str) {
    if let Some(c) = get_counter_vec(&EVENT_ERRORS) {
        c.with_label_values(&[event, error]).inc();
    }
}

/// Record a finished match.
#[inline]
pub fn record_match(winner: &str) {
    if let Some(c) = get_counter_vec(&MATCHES_COMPLETED) {
        c.with_label_values(&[winner]).inc();
    }
}

#[inline]
pub fn record_archive_failure() {
    if let Some(c) = get_counter(&ARCHIVE_FAILURES) {
        c.inc();
    }
}

#[inline]
pub fn record_rate_limited() {
    if let Some(c) = get_counter(&RATE_LIMITED) {
        c.inc();
    }
}

#[inline]
pub fn record_slow_consumer() {
    if let Some(c) = get_counter(&SLOW_CONSUMERS) {
        c.inc();
    }
}

pub fn client_connected() {
    if let Some(g) = get_gauge(&CONNECTED_CLIENTS) {
        g.inc();
    }
}

pub fn client_disconnected() {
    if let Some(g) = get_gauge(&CONNECTED_CLIENTS) {
        g.dec();
    }
}

pub fn room_opened() {
    if let Some(g) = get_gauge(&ACTIVE_ROOMS) {
        g.inc();
    }
}

pub fn room_closed() {
    if let Some(g) = get_gauge(&ACTIVE_ROOMS) {
        g.dec();
    }
}
