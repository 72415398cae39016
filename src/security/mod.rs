//! Security module for tictacd.
//!
//! - **Rate Limiting**: Governor-based flood protection for inbound events

pub mod rate_limit;

pub use rate_limit::RateLimitManager;
