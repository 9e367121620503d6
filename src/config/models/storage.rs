//! Persistence configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of the persisted rate-limit state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON state file
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

fn default_state_file() -> PathBuf {
    PathBuf::from("rate_limit_data.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.state_file, PathBuf::from("rate_limit_data.json"));
    }
}
