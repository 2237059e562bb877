//! Configuration file handling

use serde::Deserialize;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Tester server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Output polling settings
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Tester server connection settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Base URL of the tester web service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8888".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Output polling settings
#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    /// Seconds between output fetches while a run is streaming
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
        }
    }
}

fn default_poll_interval() -> u64 {
    1
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://localhost:8888");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.polling.interval_secs, 1);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "http://10.0.0.5:8888"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.5:8888");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.polling.interval_secs, 1);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nbase_url = \"http://router-lab:8888\"\n\n[polling]\ninterval_secs = 2\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.base_url, "http://router-lab:8888");
        assert_eq!(config.polling.interval_secs, 2);

        assert!(Config::load_from(&dir.path().join("missing.toml")).is_err());
    }
}
