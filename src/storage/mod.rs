//! Storage layer for the gateway
//!
//! The only persistent state is the rate limiter's snapshot file.

pub mod state_file;

pub use state_file::{RateLimitSnapshot, StateFile};
