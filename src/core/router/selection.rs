//! Key selection policy
//!
//! Two-phase selection per provider: a least-used fast path that biases load
//! toward under-used credentials, and a bounded round-robin fallback scan
//! that keeps the provider live while any credential has headroom. A
//! usage-gap guard caps the spread between the most- and least-used
//! credentials; it applies to both phases.

use super::key_pool::KeyPool;
use crate::config::Config;
use crate::core::rate_limiter::RateLimiter;
use crate::utils::error::{GatewayError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Selects an admissible credential for a provider
pub struct KeySelector {
    config: Arc<Config>,
    limiter: Arc<RateLimiter>,
    pools: HashMap<String, KeyPool>,
}

impl KeySelector {
    /// Build one pool per configured provider
    pub fn new(config: Arc<Config>, limiter: Arc<RateLimiter>) -> Self {
        let pools = config
            .providers
            .iter()
            .map(|p| (p.name.clone(), KeyPool::new(p.keys.clone())))
            .collect();
        Self {
            config,
            limiter,
            pools,
        }
    }

    /// Select a credential for the provider, recording its admission
    ///
    /// Fails with [`GatewayError::AllKeysRateLimited`] when every distinct
    /// credential is over limit or rejected by the usage-gap guard, and with
    /// [`GatewayError::Config`] when the provider has no configured pool.
    pub fn select(&self, provider: &str) -> Result<String> {
        let pool = self.pools.get(provider).ok_or_else(|| {
            GatewayError::config(format!("No keys available for provider '{}'", provider))
        })?;
        let limits = self
            .config
            .limits_for(provider)
            .unwrap_or_default();

        // Fast path: the least-used credential, when one has been recorded
        if let Some(least_used) = self.least_used_key(provider, pool) {
            if !self.usage_gap_exceeded(provider, pool, &least_used)
                && self.limiter.admit(provider, &least_used, &limits)
            {
                return Ok(least_used);
            }
        }

        // Fallback: bounded scan from the pool cursor
        for key in pool.scan() {
            if self.usage_gap_exceeded(provider, pool, key) {
                debug!(provider, "Skipping credential over the usage-gap threshold");
                continue;
            }
            if self.limiter.admit(provider, key, &limits) {
                return Ok(key.to_string());
            }
        }

        Err(GatewayError::AllKeysRateLimited(provider.to_string()))
    }

    /// The credential with the lowest recorded lifetime counter
    ///
    /// Credentials that never served a request are not candidates here; ties
    /// are broken by pool order.
    fn least_used_key(&self, provider: &str, pool: &KeyPool) -> Option<String> {
        let mut best: Option<(&str, u64)> = None;
        for key in pool.keys() {
            let count = self.limiter.request_count(provider, key);
            if count == 0 {
                continue;
            }
            if best.is_none_or(|(_, best_count)| count < best_count) {
                best = Some((key, count));
            }
        }
        best.map(|(key, _)| key.to_string())
    }

    /// Whether selecting `candidate` would stretch the usage gap past the
    /// configured threshold
    ///
    /// The gap is the candidate's post-selection lifetime count minus the
    /// pool's least-used count, measured against the threshold percentage of
    /// the provider's daily ceiling. A single-credential pool is never
    /// rejected.
    fn usage_gap_exceeded(&self, provider: &str, pool: &KeyPool, candidate: &str) -> bool {
        if pool.len() < 2 {
            return false;
        }
        let day_limit = self
            .config
            .limits_for(provider)
            .unwrap_or_default()
            .max_requests_per_day;
        let candidate_after = self.limiter.request_count(provider, candidate) + 1;
        let new_min = pool
            .keys()
            .iter()
            .map(|key| {
                if key == candidate {
                    candidate_after
                } else {
                    self.limiter.request_count(provider, key)
                }
            })
            .min()
            .unwrap_or(candidate_after);

        let allowed_gap =
            self.config.routing.usage_gap_percentage / 100.0 * day_limit as f64;
        (candidate_after - new_min) as f64 > allowed_gap
    }
}
