//! Rate limiter types and data structures

use crate::config::ProviderLimits;
use serde::Serialize;
use std::collections::BTreeMap;

/// Length of the per-minute sliding window, in seconds
pub const MINUTE_WINDOW_SECS: f64 = 60.0;

/// Length of the per-day sliding window, in seconds
pub const DAY_WINDOW_SECS: f64 = 86_400.0;

/// Usage bookkeeping for one (provider, credential) pair
#[derive(Debug, Clone, Default)]
pub(super) struct CredentialUsage {
    /// Lifetime request counter, reset only by wiping the state file
    pub(super) requests: u64,
    /// Lifetime token counter (tracked, never enforced)
    pub(super) tokens: u64,
    /// Timestamps of requests in the trailing 60 seconds
    pub(super) minute_window: Vec<f64>,
    /// Timestamps of requests in the trailing 24 hours
    pub(super) day_window: Vec<f64>,
}

/// Composite key for a persisted minute window
pub(super) fn minute_window_key(provider: &str, key: &str) -> String {
    format!("req_min:{}:{}", provider, key)
}

/// Composite key for a persisted day window
pub(super) fn day_window_key(provider: &str, key: &str) -> String {
    format!("req_day:{}:{}", provider, key)
}

/// Split a persisted window key into (kind, provider, credential)
pub(super) fn parse_window_key(composite: &str) -> Option<(&str, &str, &str)> {
    let mut parts = composite.splitn(3, ':');
    Some((parts.next()?, parts.next()?, parts.next()?))
}

/// Read-only usage report served by the usage endpoint
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    /// Per-provider aggregate utilization
    pub overview: BTreeMap<String, ProviderOverview>,
    /// Per-provider per-key breakdown
    pub details: BTreeMap<String, ProviderDetail>,
}

/// Aggregate utilization of one provider's credential pool
#[derive(Debug, Clone, Serialize)]
pub struct ProviderOverview {
    /// Lifetime requests across the pool
    pub total_requests: u64,
    /// Daily ceiling times pool size
    pub total_capacity: u64,
    /// Requests as a percentage of capacity, rounded to two decimals
    pub usage_percentage: f64,
}

/// Per-key breakdown for one provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDetail {
    /// Usage per credential
    pub keys: BTreeMap<String, KeyUsage>,
    /// The provider's configured ceilings
    pub rate_limits: ProviderLimits,
}

/// Usage of a single credential
#[derive(Debug, Clone, Serialize)]
pub struct KeyUsage {
    /// Lifetime requests
    pub requests: u64,
    /// Requests as a percentage of the daily ceiling, rounded to two decimals
    pub usage_percentage: f64,
    /// Current window sizes
    pub rate_limit_windows: WindowSizes,
}

/// Sizes of the two sliding windows
#[derive(Debug, Clone, Serialize)]
pub struct WindowSizes {
    /// Entries in the trailing-minute window
    pub req_min: usize,
    /// Entries in the trailing-day window
    pub req_day: usize,
}

/// Round a percentage to two decimal places
pub(super) fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
