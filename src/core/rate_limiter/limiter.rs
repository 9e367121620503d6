//! Sliding-window rate limit tracker
//!
//! Tracks per-credential usage in two sliding windows (trailing minute and
//! trailing day) plus a lifetime counter, and persists the whole state to a
//! JSON file through a write-behind flush task. Admission checks and their
//! window writes happen under a single map-entry lock, so concurrent calls
//! for the same credential cannot interleave their prune-then-append
//! sequence; different credentials proceed in parallel.

use super::types::{
    CredentialUsage, DAY_WINDOW_SECS, KeyUsage, MINUTE_WINDOW_SECS, ProviderDetail,
    ProviderOverview, UsageReport, WindowSizes, day_window_key, minute_window_key,
    parse_window_key, round_percentage,
};
use crate::config::{ProviderConfig, ProviderLimits};
use crate::storage::{RateLimitSnapshot, StateFile};
use crate::utils::error::Result;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

type UsageKey = (String, String);

/// Sliding-window rate limit tracker for all (provider, credential) pairs
pub struct RateLimiter {
    inner: Arc<LimiterInner>,
    flush_tx: mpsc::UnboundedSender<()>,
}

struct LimiterInner {
    entries: DashMap<UsageKey, CredentialUsage>,
    store: StateFile,
}

impl RateLimiter {
    /// Open the tracker, restoring any persisted state
    ///
    /// Spawns the write-behind flush task; must be called from within a tokio
    /// runtime.
    pub async fn open(store: StateFile) -> Result<Self> {
        let snapshot = store.load().await?;
        let inner = Arc::new(LimiterInner {
            entries: restore_entries(snapshot),
            store,
        });

        let (flush_tx, flush_rx) = mpsc::unbounded_channel();
        tokio::spawn(flush_loop(inner.clone(), flush_rx));

        Ok(Self { inner, flush_tx })
    }

    /// Check both sliding windows and record the request if admitted
    ///
    /// Checks short-circuit: a failed minute check leaves no trace, a failed
    /// day check leaves the already-passed minute append in place. The
    /// lifetime counter and the flush only happen on full admission.
    pub fn admit(&self, provider: &str, key: &str, limits: &ProviderLimits) -> bool {
        self.admit_at(provider, key, limits, epoch_now())
    }

    pub(crate) fn admit_at(
        &self,
        provider: &str,
        key: &str,
        limits: &ProviderLimits,
        now: f64,
    ) -> bool {
        let admitted = {
            let mut entry = self
                .inner
                .entries
                .entry((provider.to_string(), key.to_string()))
                .or_default();

            entry.minute_window.retain(|&t| t > now - MINUTE_WINDOW_SECS);
            if entry.minute_window.len() >= limits.max_requests_per_minute as usize {
                return false;
            }
            entry.minute_window.push(now);

            entry.day_window.retain(|&t| t > now - DAY_WINDOW_SECS);
            if entry.day_window.len() >= limits.max_requests_per_day as usize {
                return false;
            }
            entry.day_window.push(now);

            entry.requests += 1;
            true
        };

        if admitted {
            self.schedule_flush();
        }
        admitted
    }

    /// Mark a credential as fully consumed for the next 24 hours
    ///
    /// Overwrites the day window with `limit` synthetic timestamps equal to
    /// now, so admission fails until they age out of the window.
    pub fn force_exhaust(&self, provider: &str, key: &str, limit: u32) {
        self.force_exhaust_at(provider, key, limit, epoch_now());
    }

    pub(crate) fn force_exhaust_at(&self, provider: &str, key: &str, limit: u32, now: f64) {
        {
            let mut entry = self
                .inner
                .entries
                .entry((provider.to_string(), key.to_string()))
                .or_default();
            entry.day_window = vec![now; limit as usize];
        }
        debug!(provider, key_count = limit, "Forced credential exhaustion");
        self.schedule_flush();
    }

    /// Record token usage for a credential (bookkeeping only)
    pub fn record_tokens(&self, provider: &str, key: &str, tokens: u64) {
        {
            let mut entry = self
                .inner
                .entries
                .entry((provider.to_string(), key.to_string()))
                .or_default();
            entry.tokens += tokens;
        }
        self.schedule_flush();
    }

    /// Lifetime request count of a credential
    pub fn request_count(&self, provider: &str, key: &str) -> u64 {
        self.inner
            .entries
            .get(&(provider.to_string(), key.to_string()))
            .map(|entry| entry.requests)
            .unwrap_or(0)
    }

    /// Build the read-only usage report over the configured providers
    pub fn usage_report(&self, providers: &[ProviderConfig]) -> UsageReport {
        let mut overview = BTreeMap::new();
        let mut details = BTreeMap::new();

        for provider in providers {
            let day_limit = provider.limits.max_requests_per_day as u64;
            let mut keys = BTreeMap::new();
            let mut total_requests = 0;

            for key in &provider.keys {
                let (requests, req_min, req_day) = self
                    .inner
                    .entries
                    .get(&(provider.name.clone(), key.clone()))
                    .map(|e| (e.requests, e.minute_window.len(), e.day_window.len()))
                    .unwrap_or((0, 0, 0));
                total_requests += requests;
                keys.insert(
                    key.clone(),
                    KeyUsage {
                        requests,
                        usage_percentage: round_percentage(
                            requests as f64 / day_limit.max(1) as f64 * 100.0,
                        ),
                        rate_limit_windows: WindowSizes { req_min, req_day },
                    },
                );
            }

            let total_capacity = day_limit * provider.keys.len() as u64;
            let usage_percentage = if total_capacity > 0 {
                round_percentage(total_requests as f64 / total_capacity as f64 * 100.0)
            } else {
                0.0
            };

            overview.insert(
                provider.name.clone(),
                ProviderOverview {
                    total_requests,
                    total_capacity,
                    usage_percentage,
                },
            );
            details.insert(
                provider.name.clone(),
                ProviderDetail {
                    keys,
                    rate_limits: provider.limits,
                },
            );
        }

        UsageReport { overview, details }
    }

    /// Persist the current state immediately, bypassing the flush task
    pub async fn flush_now(&self) -> Result<()> {
        self.inner.store.save(&self.inner.snapshot()).await
    }

    fn schedule_flush(&self) {
        // The receiver lives as long as the flush task; a send can only fail
        // during shutdown, when losing the flush is acceptable.
        let _ = self.flush_tx.send(());
    }
}

impl LimiterInner {
    fn snapshot(&self) -> RateLimitSnapshot {
        let mut snapshot = RateLimitSnapshot::default();
        for item in self.entries.iter() {
            let (provider, key) = item.key();
            let usage = item.value();
            if usage.requests > 0 {
                snapshot
                    .request_counts
                    .entry(provider.clone())
                    .or_default()
                    .insert(key.clone(), usage.requests);
            }
            if usage.tokens > 0 {
                snapshot
                    .token_counts
                    .entry(provider.clone())
                    .or_default()
                    .insert(key.clone(), usage.tokens);
            }
            if !usage.minute_window.is_empty() {
                snapshot
                    .rate_limit_windows
                    .insert(minute_window_key(provider, key), usage.minute_window.clone());
            }
            if !usage.day_window.is_empty() {
                snapshot
                    .rate_limit_windows
                    .insert(day_window_key(provider, key), usage.day_window.clone());
            }
        }
        snapshot
    }
}

/// Write-behind persistence task
///
/// Coalesces queued flush signals into one snapshot-and-save, so a burst of
/// admissions costs a single file write and never blocks in-flight checks.
async fn flush_loop(inner: Arc<LimiterInner>, mut flush_rx: mpsc::UnboundedReceiver<()>) {
    while flush_rx.recv().await.is_some() {
        while flush_rx.try_recv().is_ok() {}
        let snapshot = inner.snapshot();
        if let Err(e) = inner.store.save(&snapshot).await {
            warn!("Failed to persist rate limit state: {}", e);
        }
    }
}

fn restore_entries(snapshot: RateLimitSnapshot) -> DashMap<UsageKey, CredentialUsage> {
    let entries: DashMap<UsageKey, CredentialUsage> = DashMap::new();

    for (provider, counts) in snapshot.request_counts {
        for (key, requests) in counts {
            entries
                .entry((provider.clone(), key))
                .or_default()
                .requests = requests;
        }
    }
    for (provider, counts) in snapshot.token_counts {
        for (key, tokens) in counts {
            entries.entry((provider.clone(), key)).or_default().tokens = tokens;
        }
    }
    for (composite, timestamps) in snapshot.rate_limit_windows {
        let Some((kind, provider, key)) = parse_window_key(&composite) else {
            warn!(window = %composite, "Skipping unrecognized window key in state file");
            continue;
        };
        let mut entry = entries
            .entry((provider.to_string(), key.to_string()))
            .or_default();
        match kind {
            "req_min" => entry.minute_window = timestamps,
            "req_day" => entry.day_window = timestamps,
            _ => {
                warn!(window = %composite, "Skipping unrecognized window kind in state file");
            }
        }
    }

    entries
}

/// Current time as fractional epoch seconds
pub(crate) fn epoch_now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
