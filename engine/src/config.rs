//! Engine configuration with TOML file support.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use testament_tracker::RetryPolicy;
use testament_types::Network;

/// Configuration for a testament engine session.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds between account + authorization refreshes once ready.
    #[serde(default = "default_account_refresh_secs")]
    pub account_refresh_secs: u64,

    /// Seconds between transaction-history refreshes once ready.
    #[serde(default = "default_history_refresh_secs")]
    pub history_refresh_secs: u64,

    /// Milliseconds between attempts of every retry loop: provider
    /// resolution, account bootstrap and confirmation polling.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Explorer status endpoints by network, overriding the built-in
    /// public endpoints. Required for `private` deployments, which have
    /// no public explorer.
    #[serde(default)]
    pub status_endpoints: HashMap<Network, String>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_account_refresh_secs() -> u64 {
    5
}

fn default_history_refresh_secs() -> u64 {
    10
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("EngineConfig is always serializable to TOML")
    }

    pub fn account_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.account_refresh_secs)
    }

    pub fn history_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.history_refresh_secs)
    }

    /// The production retry schedule: fixed delay, no attempt limit.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::unbounded(Duration::from_millis(self.retry_delay_ms))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            account_refresh_secs: default_account_refresh_secs(),
            history_refresh_secs: default_history_refresh_secs(),
            retry_delay_ms: default_retry_delay_ms(),
            status_endpoints: HashMap::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = EngineConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = EngineConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.account_refresh_secs, config.account_refresh_secs);
        assert_eq!(parsed.retry_delay_ms, config.retry_delay_ms);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.account_refresh_secs, 5);
        assert_eq!(config.history_refresh_secs, 10);
        assert_eq!(config.retry_delay_ms, 1_000);
        assert_eq!(config.log_format, "human");
        assert!(config.status_endpoints.is_empty());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            history_refresh_secs = 30

            [status_endpoints]
            private = "http://localhost:4000/api"
        "#;
        let config = EngineConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.history_refresh_secs, 30);
        assert_eq!(config.account_refresh_secs, 5); // default
        assert_eq!(
            config.status_endpoints.get(&Network::Private).unwrap(),
            "http://localhost:4000/api"
        );
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = EngineConfig::from_toml_file("/nonexistent/testament.toml");
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("testament.toml");
        std::fs::write(&path, "retry_delay_ms = 250\n").expect("write config");
        let config = EngineConfig::from_toml_file(path.to_str().unwrap()).expect("should parse");
        assert_eq!(config.retry_delay_ms, 250);
    }
}
