//! Core functionality for the gateway
//!
//! Credential scheduling, rate limiting, routing, and the streaming relay.

pub mod completion;
pub mod models;
pub mod providers;
pub mod rate_limiter;
pub mod router;
pub mod streaming;
