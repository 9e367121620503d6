//! Configuration management for the gateway
//!
//! This module handles loading and validation of all gateway configuration.

pub mod models;

pub use models::*;

use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Caller authentication
    #[serde(default)]
    pub auth: AuthConfig,
    /// Upstream providers and their credential pools
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Auto-model routing and key selection
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Streaming relay keep-alive and timeout
    #[serde(default)]
    pub streaming: StreamingConfig,
    /// Rate-limit state persistence
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| GatewayError::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for provider in &self.providers {
            if provider.name.is_empty() {
                return Err(GatewayError::config("Provider name must not be empty"));
            }
            if provider.keys.is_empty() {
                return Err(GatewayError::config(format!(
                    "No keys configured for provider '{}'",
                    provider.name
                )));
            }
            if let Some(base_url) = &provider.base_url {
                url::Url::parse(base_url).map_err(|e| {
                    GatewayError::config(format!(
                        "Invalid base_url for provider '{}': {}",
                        provider.name, e
                    ))
                })?;
            }
        }
        if !(0.0..=100.0).contains(&self.routing.usage_gap_percentage) {
            return Err(GatewayError::config(
                "usage_gap_percentage must be between 0 and 100",
            ));
        }
        Ok(())
    }

    /// Look up a provider by name
    pub fn provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Rate limits for a provider, if configured
    pub fn limits_for(&self, name: &str) -> Option<ProviderLimits> {
        self.provider(name).map(|p| p.limits)
    }

    /// First credential of a provider's pool, if any
    pub fn first_key(&self, name: &str) -> Option<&str> {
        self.provider(name)
            .and_then(|p| p.keys.first())
            .map(String::as_str)
    }
}
