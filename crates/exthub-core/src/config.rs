//! Hub configuration with environment overrides.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable names.
pub mod env_vars {
    pub const BIND_HOST: &str = "EXTHUB_HOST";
    pub const BIND_PORT: &str = "EXTHUB_PORT";
    pub const API_KEY: &str = "EXTHUB_API_KEY";
    pub const DB_PATH: &str = "EXTHUB_DB_PATH";
    pub const PROBE_TIMEOUT_SECS: &str = "EXTHUB_PROBE_TIMEOUT_SECS";
    pub const EXECUTE_TIMEOUT_SECS: &str = "EXTHUB_EXECUTE_TIMEOUT_SECS";
}

/// Default values.
pub mod defaults {
    pub const BIND_HOST: &str = "127.0.0.1";
    pub const BIND_PORT: u16 = 8420;
    /// Bounded timeout for `/info` and `/capabilities` probes.
    pub const PROBE_TIMEOUT_SECS: u64 = 10;
    /// Bounded timeout for `/execute` forwards.
    pub const EXECUTE_TIMEOUT_SECS: u64 = 30;
    /// Fail fast when an extension does not accept the connection.
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;
}

/// Hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Host to bind the API server to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind the API server to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared admin credential for registry writes (X-API-Key header).
    /// Writes are rejected until one is configured.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Path to the registry database. In-memory registry when unset.
    #[serde(default)]
    pub db_path: Option<String>,
    /// Timeout in seconds for `/info` and `/capabilities` probes.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Timeout in seconds for `/execute` forwards.
    #[serde(default = "default_execute_timeout_secs")]
    pub execute_timeout_secs: u64,
}

fn default_host() -> String {
    defaults::BIND_HOST.to_string()
}

fn default_port() -> u16 {
    defaults::BIND_PORT
}

fn default_probe_timeout_secs() -> u64 {
    defaults::PROBE_TIMEOUT_SECS
}

fn default_execute_timeout_secs() -> u64 {
    defaults::EXECUTE_TIMEOUT_SECS
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
            db_path: None,
            probe_timeout_secs: default_probe_timeout_secs(),
            execute_timeout_secs: default_execute_timeout_secs(),
        }
    }
}

impl HubConfig {
    /// Load configuration from `EXTHUB_*` environment variables,
    /// falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = std::env::var(env_vars::BIND_HOST) {
            config.host = host;
        }
        if let Some(port) = env_u64(env_vars::BIND_PORT) {
            config.port = port as u16;
        }
        if let Ok(key) = std::env::var(env_vars::API_KEY) {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Ok(path) = std::env::var(env_vars::DB_PATH) {
            if !path.is_empty() {
                config.db_path = Some(path);
            }
        }
        if let Some(secs) = env_u64(env_vars::PROBE_TIMEOUT_SECS) {
            config.probe_timeout_secs = secs;
        }
        if let Some(secs) = env_u64(env_vars::EXECUTE_TIMEOUT_SECS) {
            config.execute_timeout_secs = secs;
        }
        config
    }

    /// Probe timeout as a Duration.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Execute timeout as a Duration.
    pub fn execute_timeout(&self) -> Duration {
        Duration::from_secs(self.execute_timeout_secs)
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.port, defaults::BIND_PORT);
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert_eq!(config.execute_timeout(), Duration::from_secs(30));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: HubConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, defaults::BIND_HOST);
        assert_eq!(config.probe_timeout_secs, defaults::PROBE_TIMEOUT_SECS);
    }
}
