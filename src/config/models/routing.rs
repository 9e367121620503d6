//! Model routing configuration

use serde::{Deserialize, Serialize};

/// Configuration for auto-model routing and key selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Ordered preference list for the `auto-model` pseudo-model
    #[serde(default)]
    pub auto_models: Vec<String>,
    /// Usage-gap guard threshold, as a percentage of the daily ceiling
    #[serde(default = "default_usage_gap_percentage")]
    pub usage_gap_percentage: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            auto_models: Vec::new(),
            usage_gap_percentage: default_usage_gap_percentage(),
        }
    }
}

fn default_usage_gap_percentage() -> f64 {
    5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_config_default() {
        let config = RoutingConfig::default();
        assert!(config.auto_models.is_empty());
        assert!((config.usage_gap_percentage - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_routing_config_deserialization() {
        let yaml = r#"
auto_models:
  - deepseek/deepseek-r1:free
  - gemini-2.0-flash
usage_gap_percentage: 10
"#;
        let config: RoutingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.auto_models.len(), 2);
        assert!((config.usage_gap_percentage - 10.0).abs() < f64::EPSILON);
    }
}
