//! # keyrelay
//!
//! An admission-controlled AI gateway: accepts OpenAI-compatible chat
//! completion requests from a single trusted caller and relays them to an
//! upstream provider through a pool of interchangeable API credentials.
//!
//! ## Features
//!
//! - **Credential scheduling**: least-used-first selection over per-provider
//!   key pools, with a round-robin fallback scan and a usage-gap guard
//! - **Sliding-window rate limiting**: per-key minute and day windows,
//!   persisted across restarts
//! - **Quota signal detection**: upstream "quota exceeded" error text
//!   proactively blacklists the offending credential
//! - **Streaming relay**: SSE pass-through with keep-alive and timeout
//!   discipline
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use keyrelay::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config).await?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use crate::core::completion::{ChatReply, RequestCoordinator};
pub use crate::core::models::{ChatCompletionRequest, ModelEntry, ModelListResponse};
pub use crate::core::providers::{LlmBackend, OpenAiCompatBackend};
pub use crate::core::rate_limiter::{RateLimiter, UsageReport};
pub use crate::core::router::{AUTO_MODEL_ID, KeySelector, ModelRouter};

use tracing::info;

/// A minimal gateway handle wrapping the HTTP server
pub struct Gateway {
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");
        let server = server::HttpServer::new(&config).await?;
        Ok(Self { server })
    }

    /// Run the gateway server until it stops
    pub async fn run(self) -> Result<()> {
        info!("Starting keyrelay gateway");
        self.server.start().await
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, "keyrelay");
    }
}
