//! Authentication configuration

use serde::{Deserialize, Serialize};

/// Authentication configuration
///
/// The gateway serves a single trusted caller; authentication is an exact
/// match against one static bearer token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Static access key the caller must present as a bearer token
    #[serde(default)]
    pub access_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_default_is_empty() {
        let config = AuthConfig::default();
        assert!(config.access_key.is_empty());
    }

    #[test]
    fn test_auth_config_deserialization() {
        let config: AuthConfig = serde_yaml::from_str("access_key: secret-token").unwrap();
        assert_eq!(config.access_key, "secret-token");
    }
}
