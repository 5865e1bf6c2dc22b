//! Store configuration
//!
//! Loaded from TOML when a config file is present, with working defaults
//! otherwise. The policy variant switch lives here so the relaxed
//! manager rule is an explicit deployment decision, never a code path
//! someone flips silently.

use crewtrack_policy::{ManagerScope, Policy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the store and its HTTP collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the tracker service API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Reach of the global `ProjectManager` role
    pub manager_scope: ManagerScope,
}

impl StoreConfig {
    /// Configuration with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns the deserializer's error for malformed or mistyped input.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// With a base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With the relaxed or strict manager scope
    #[inline]
    #[must_use]
    pub fn with_manager_scope(mut self, scope: ManagerScope) -> Self {
        self.manager_scope = scope;
        self
    }

    /// The authorization policy this configuration selects
    #[inline]
    #[must_use]
    pub fn policy(&self) -> Policy {
        Policy::with_manager_scope(self.manager_scope)
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001/api".to_string(),
            timeout_secs: 30,
            manager_scope: ManagerScope::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict() {
        let config = StoreConfig::new();
        assert_eq!(config.manager_scope, ManagerScope::ManagedProjectsOnly);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn parses_toml() {
        let config = StoreConfig::from_toml_str(
            r#"
            base_url = "https://tracker.example.com/api"
            timeout_secs = 10
            manager_scope = "any-project"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://tracker.example.com/api");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.manager_scope, ManagerScope::AnyProject);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = StoreConfig::from_toml_str("timeout_secs = 5").unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.base_url, StoreConfig::default().base_url);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(StoreConfig::from_toml_str("timeout_secs = \"soon\"").is_err());
    }
}
