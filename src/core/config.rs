//! Configuration module for the planner
//!
//! Handles application configuration including:
//! - Plan backend connection settings
//! - Media pipeline tuning (batching, prefetch, thumbnails)
//! - Logging
//!
//! Values come from built-in defaults, an optional config file and
//! `PLANNER__SECTION__KEY` environment overrides, in that order.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::logging::LoggingConfig;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "PLANNER";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Plan backend settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Media pipeline settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Plan backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the plan API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Bearer token obtained by the login flow
    #[serde(default, skip_serializing)]
    pub auth_token: Option<SecretString>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            auth_token: None,
        }
    }
}

/// Media pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Plans processed concurrently per chunk
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Extensions treated as video (compared case-insensitively)
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// Enable image cache warming after each fetch
    #[serde(default = "default_true")]
    pub prefetch_enabled: bool,

    /// Number of leading plans whose media is warmed
    #[serde(default = "default_prefetch_count")]
    pub prefetch_count: usize,

    /// Requested width of prefetched images
    #[serde(default = "default_prefetch_width")]
    pub prefetch_width: u32,

    /// Requested quality (1-100) of prefetched images
    #[serde(default = "default_prefetch_quality")]
    pub prefetch_quality: u8,

    /// Remote thumbnail service; thumbnails are disabled when unset
    #[serde(default)]
    pub thumbnail_endpoint: Option<String>,
}

fn default_batch_size() -> usize {
    3
}

fn default_video_extensions() -> Vec<String> {
    ["mp4", "mov", "avi", "wmv"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_prefetch_count() -> usize {
    5
}

fn default_prefetch_width() -> u32 {
    300
}

fn default_prefetch_quality() -> u8 {
    70
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            video_extensions: default_video_extensions(),
            prefetch_enabled: true,
            prefetch_count: default_prefetch_count(),
            prefetch_width: default_prefetch_width(),
            prefetch_quality: default_prefetch_quality(),
            thumbnail_endpoint: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            base_url = %config.service.base_url,
            batch_size = config.media.batch_size,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("myelin-planner")
            .join("config.toml")
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.media.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "media.batch_size".to_string(),
                value: "0".to_string(),
            });
        }

        if !(1..=100).contains(&self.media.prefetch_quality) {
            return Err(ConfigError::InvalidValue {
                field: "media.prefetch_quality".to_string(),
                value: self.media.prefetch_quality.to_string(),
            });
        }

        if reqwest::Url::parse(&self.service.base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "service.base_url".to_string(),
                value: self.service.base_url.clone(),
            });
        }

        if let Some(endpoint) = &self.media.thumbnail_endpoint {
            if reqwest::Url::parse(endpoint).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "media.thumbnail_endpoint".to_string(),
                    value: endpoint.clone(),
                });
            }
        }

        Ok(())
    }
}
