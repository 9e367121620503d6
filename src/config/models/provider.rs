//! Upstream provider configuration

use serde::{Deserialize, Serialize};

/// Configuration for one upstream provider and its credential pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name (openrouter, gemini, ...)
    pub name: String,
    /// Ordered credential pool
    pub keys: Vec<String>,
    /// Base URL override for the provider's OpenAI-compatible endpoint
    #[serde(default)]
    pub base_url: Option<String>,
    /// Provider-imposed rate limits
    #[serde(flatten)]
    pub limits: ProviderLimits,
}

/// Per-provider rate limit ceilings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderLimits {
    /// Maximum requests per credential per day
    #[serde(default = "default_requests_per_day")]
    pub max_requests_per_day: u32,
    /// Maximum tokens per credential per minute (tracked, not enforced)
    #[serde(default = "default_tokens_per_minute")]
    pub max_tokens_per_minute: u32,
    /// Maximum requests per credential per minute
    #[serde(default = "default_requests_per_minute")]
    pub max_requests_per_minute: u32,
}

impl Default for ProviderLimits {
    fn default() -> Self {
        Self {
            max_requests_per_day: default_requests_per_day(),
            max_tokens_per_minute: default_tokens_per_minute(),
            max_requests_per_minute: default_requests_per_minute(),
        }
    }
}

fn default_requests_per_day() -> u32 {
    1500
}

fn default_tokens_per_minute() -> u32 {
    150_000
}

fn default_requests_per_minute() -> u32 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_limits_default() {
        let limits = ProviderLimits::default();
        assert_eq!(limits.max_requests_per_day, 1500);
        assert_eq!(limits.max_tokens_per_minute, 150_000);
        assert_eq!(limits.max_requests_per_minute, 15);
    }

    #[test]
    fn test_provider_config_deserialization() {
        let yaml = r#"
name: openrouter
keys:
  - sk-or-one
  - sk-or-two
max_requests_per_minute: 20
"#;
        let config: ProviderConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "openrouter");
        assert_eq!(config.keys.len(), 2);
        assert_eq!(config.limits.max_requests_per_minute, 20);
        assert_eq!(config.limits.max_requests_per_day, 1500);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_provider_limits_flattened_serialization() {
        let config = ProviderConfig {
            name: "gemini".to_string(),
            keys: vec!["g-key".to_string()],
            base_url: None,
            limits: ProviderLimits::default(),
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["max_requests_per_day"], 1500);
        assert_eq!(json["name"], "gemini");
    }
}
