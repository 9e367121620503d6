//! Streaming relay configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Keep-alive and timeout settings for the streaming relay
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Seconds of silence before a keep-alive comment frame is emitted
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
    /// Seconds since the last real frame before the relay gives up
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl StreamingConfig {
    /// Keep-alive interval as a [`Duration`]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    /// Idle timeout as a [`Duration`]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            keep_alive_secs: default_keep_alive_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

fn default_keep_alive_secs() -> u64 {
    5
}

fn default_idle_timeout_secs() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_config_default() {
        let config = StreamingConfig::default();
        assert_eq!(config.keep_alive(), Duration::from_secs(5));
        assert_eq!(config.idle_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_streaming_config_deserialization_defaults() {
        let config: StreamingConfig = serde_yaml::from_str("keep_alive_secs: 2").unwrap();
        assert_eq!(config.keep_alive_secs, 2);
        assert_eq!(config.idle_timeout_secs, 300);
    }
}
