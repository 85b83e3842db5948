//! Server configuration loaded from environment variables

use debugview_common::constants::DEFAULT_PORT;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,

    /// Port for the debug endpoint and browser viewer
    pub port: u16,

    /// Root of the app data (`shared_prefs/`, `databases/`, `paper/`)
    pub data_dir: PathBuf,

    /// App name, used for the default preference file (`<app>_preferences`)
    pub app_name: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration from any variable lookup
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match var("PORT") {
            Some(port) => port.parse().map_err(|_| ConfigError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };

        let app_name = var("APP_NAME").unwrap_or_else(|| "app".to_string());
        if app_name.trim().is_empty() {
            return Err(ConfigError::Invalid("APP_NAME"));
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            data_dir: var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./debug-data")),
            app_name,
        })
    }

    /// Name of the preference file advertised when none exist
    pub fn default_prefs_name(&self) -> String {
        format!("{}_preferences", self.app_name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(String),

    #[error("Environment variable {0} must not be empty")]
    Invalid(&'static str),
}
