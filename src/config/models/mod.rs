//! Configuration data models

pub mod auth;
pub mod provider;
pub mod routing;
pub mod server;
pub mod storage;
pub mod streaming;

pub use auth::AuthConfig;
pub use provider::{ProviderConfig, ProviderLimits};
pub use routing::RoutingConfig;
pub use server::ServerConfig;
pub use storage::StorageConfig;
pub use streaming::StreamingConfig;
