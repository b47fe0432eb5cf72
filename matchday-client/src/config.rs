//! Configuration loading for the matchday client.
//!
//! Configuration is loaded from a TOML file (default: `matchday.toml`).

use matchday_types::UserId;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheSettings;

/// Root client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Community API endpoint.
    pub api: ApiConfig,
    /// The signed-in user.
    pub viewer: ViewerConfig,
    /// Cache behaviour.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Community API endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.example.com/v1`.
    pub base_url: String,
    /// Bearer token for authenticated calls.
    pub token: Option<String>,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// The signed-in user. Used to decide which side of a friendship they are on.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    /// Viewer's user id.
    pub user_id: String,
}

/// Cache behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Seconds before a loaded value counts as stale (default: 30).
    #[serde(default = "default_stale_time_secs")]
    pub stale_time_secs: u64,
    /// Refetch loaded slots as soon as they are invalidated (default: true).
    #[serde(default = "default_refetch_on_invalidate")]
    pub refetch_on_invalidate: bool,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_stale_time_secs() -> u64 {
    30
}

fn default_refetch_on_invalidate() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_secs: default_stale_time_secs(),
            refetch_on_invalidate: default_refetch_on_invalidate(),
        }
    }
}

impl ClientConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;

        tracing::info!(
            "Loaded config from {}: api {}, viewer {}",
            path.display(),
            config.api.base_url,
            config.viewer.user_id
        );
        Ok(config)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url is empty".into()));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must be an http(s) URL, got {}",
                self.api.base_url
            )));
        }
        if self.viewer.user_id.trim().is_empty() {
            return Err(ConfigError::Invalid("viewer.user_id is empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// The signed-in user's id.
    pub fn viewer_id(&self) -> UserId {
        UserId::new(self.viewer.user_id.trim())
    }

    /// Cache settings derived from the `[cache]` section.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            stale_time: Duration::from_secs(self.cache.stale_time_secs),
            refetch_on_invalidate: self.cache.refetch_on_invalidate,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// Parsed but unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}
