//! Remote relational backend configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Database URL (e.g., `libsql://audits.example.io`).
    #[serde(default)]
    pub url: String,

    /// Database auth token.
    #[serde(default)]
    pub auth_token: String,
}

impl RemoteConfig {
    /// Check if the remote config has the minimum required fields.
    ///
    /// When this is false the application silently runs on the local
    /// backend, whatever `store.backend` says.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert!(!RemoteConfig::default().is_configured());
    }

    #[test]
    fn configured_when_url_and_token_set() {
        let config = RemoteConfig {
            url: "libsql://audits.example.io".into(),
            auth_token: "token123".into(),
        };
        assert!(config.is_configured());
    }

    #[test]
    fn url_alone_is_not_enough() {
        let config = RemoteConfig {
            url: "libsql://audits.example.io".into(),
            auth_token: String::new(),
        };
        assert!(!config.is_configured());
    }
}
