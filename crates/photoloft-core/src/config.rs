//! Configuration module for Photoloft.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation and defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Seconds allowed for establishing a connection.
    pub connect_timeout: u64,
    /// Seconds allowed for a whole call, including the response body.
    pub call_timeout: u64,
    /// Items requested per page from collection endpoints.
    pub page_limit: u32,
    /// User-Agent product name sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 10,
            call_timeout: 30,
            page_limit: 40,
            user_agent: format!("Photoloft/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout)
    }
}

/// Repository cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds after which successfully fetched repository data stops being
    /// considered fresh. `None` means data stays fresh until invalidated.
    pub freshness_max_age: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_max_age: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/photoloft/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("photoloft")
            .join("config.yaml")
    }

    /// Validates field ranges.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api.connect_timeout == 0 {
            anyhow::bail!("api.connect_timeout must be greater than 0");
        }
        if self.api.call_timeout == 0 {
            anyhow::bail!("api.call_timeout must be greater than 0");
        }
        if self.api.page_limit == 0 {
            anyhow::bail!("api.page_limit must be greater than 0");
        }
        Ok(())
    }
}
