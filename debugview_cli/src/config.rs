//! CLI configuration management

use anyhow::{Context, Result};
use debugview_common::constants::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the configuration directory path
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("debugview")
    }

    #[cfg(not(target_os = "windows"))]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".debugview")
    }
}

/// Get the config file path
pub fn config_file() -> PathBuf {
    config_dir().join("config.yml")
}

/// Log file used while the terminal UI owns the screen
pub fn log_file() -> PathBuf {
    config_dir().join("debugview.log")
}

/// Ensure the config directory exists
pub fn ensure_dirs() -> Result<()> {
    fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
    Ok(())
}

/// Main configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Debug server URL (default: http://localhost:8080)
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server_url() -> String {
    format!("http://localhost:{}", DEFAULT_PORT)
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load() -> Result<Self> {
        let path = config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        Self::parse(&content)
    }

    /// Parse config from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        ensure_dirs()?;
        let path = config_file();
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Apply a `--server` override
    pub fn with_server(mut self, server: Option<String>) -> Self {
        if let Some(server) = server {
            self.server_url = server;
        }
        self
    }

    /// Server URL without a trailing slash, with a scheme
    pub fn base_url(&self) -> String {
        let url = self.server_url.trim_end_matches('/');
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_parse_yaml() {
        let config = Config::parse("server_url: http://192.168.1.20:8080/\ntimeout_secs: 3\n").unwrap();
        assert_eq!(config.base_url(), "http://192.168.1.20:8080");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn test_server_override_and_scheme() {
        let config = Config::default().with_server(Some("10.0.2.2:8080".to_string()));
        assert_eq!(config.base_url(), "http://10.0.2.2:8080");

        let config = Config::default().with_server(None);
        assert_eq!(config.server_url, "http://localhost:8080");
    }

    #[test]
    fn test_rejects_bad_yaml() {
        assert!(Config::parse("timeout_secs: soon").is_err());
    }
}
