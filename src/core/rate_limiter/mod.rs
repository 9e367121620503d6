//! Credential rate limiting
//!
//! Sliding-window admission control per (provider, credential), persisted
//! across restarts, plus classification of upstream quota-exhaustion signals.

mod limiter;
pub mod quota;
mod types;


pub use limiter::RateLimiter;
pub use types::{
    KeyUsage, ProviderDetail, ProviderOverview, UsageReport, WindowSizes,
};
