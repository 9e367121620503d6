//! Quota signal detection
//!
//! Upstream providers report credential exhaustion inside free-text error
//! bodies rather than a status the gateway can trust uniformly. This module
//! keeps a declarative per-provider table of known quota phrasings; a match
//! blacklists the offending credential for the rest of its day window so the
//! next request does not have to rediscover the failure.

use super::RateLimiter;
use crate::config::ProviderLimits;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::info;

static QUOTA_ERROR_PATTERNS: Lazy<HashMap<&'static str, Vec<Regex>>> = Lazy::new(|| {
    HashMap::from([
        (
            "openrouter",
            compile(&[
                r"rate limit exceeded",
                r"quota exceeded",
                r"requests per (minute|day) exceeded",
            ]),
        ),
        (
            "gemini",
            compile(&[
                r"quota exceeded",
                r"resource exhausted",
                r"rate limit exceeded",
            ]),
        ),
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("quota pattern must be a valid regex"))
        .collect()
}

/// Whether the error text matches a known quota phrasing for the provider
///
/// Matching is case-insensitive; unknown providers never match.
pub fn classify(provider: &str, error_text: &str) -> bool {
    let Some(patterns) = QUOTA_ERROR_PATTERNS.get(provider) else {
        return false;
    };
    let lowered = error_text.to_lowercase();
    patterns.iter().any(|pattern| pattern.is_match(&lowered))
}

/// Classify an upstream error and, on a quota match, exhaust the credential
///
/// Returns `true` when the text was recognized as a quota signal; the caller
/// must then surface an admission-control failure rather than a generic
/// upstream error.
pub fn register_quota_error(
    limiter: &RateLimiter,
    provider: &str,
    key: &str,
    limits: &ProviderLimits,
    error_text: &str,
) -> bool {
    if !classify(provider, error_text) {
        return false;
    }
    info!(provider, "Upstream signaled quota exhaustion, blacklisting credential");
    limiter.force_exhaust(provider, key, limits.max_requests_per_day);
    true
}
