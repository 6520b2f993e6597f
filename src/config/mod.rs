//! Configuration management for the cowtrends service
//!
//! This module handles loading and validating configuration from
//! environment variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analytics::{TrendingConfig, DEFAULT_LIMIT, MAX_LIMIT};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Post store configuration
    pub store: StoreConfig,

    /// Trending computation configuration
    pub trending: TrendingSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Post store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path
    pub sqlite_path: PathBuf,
}

/// Trending computation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingSettings {
    /// Default number of results when no limit is requested
    pub default_limit: usize,

    /// Store query timeout in seconds
    pub query_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let sqlite_path = std::env::var("COWTRENDS_SQLITE_PATH")
            .unwrap_or_else(|_| String::from("data/posts.db"))
            .into();

        let default_limit = std::env::var("COWTRENDS_DEFAULT_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_LIMIT);

        let query_timeout_secs = std::env::var("COWTRENDS_QUERY_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5);

        let log_level =
            std::env::var("COWTRENDS_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("COWTRENDS_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            store: StoreConfig { sqlite_path },
            trending: TrendingSettings {
                default_limit,
                query_timeout_secs,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.trending.default_limit == 0 {
            anyhow::bail!("default_limit must be greater than 0");
        }

        if self.trending.default_limit > MAX_LIMIT {
            anyhow::bail!("default_limit must not exceed {MAX_LIMIT}");
        }

        if self.trending.query_timeout_secs == 0 {
            anyhow::bail!("query_timeout_secs must be greater than 0");
        }

        Ok(())
    }

    /// Get the store query timeout as Duration
    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.trending.query_timeout_secs)
    }

    /// Build the analyzer configuration from the trending section
    #[must_use]
    pub fn trending_config(&self) -> TrendingConfig {
        TrendingConfig {
            default_limit: self.trending.default_limit,
            query_timeout: self.query_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                sqlite_path: PathBuf::from("data/posts.db"),
            },
            trending: TrendingSettings {
                default_limit: DEFAULT_LIMIT,
                query_timeout_secs: 5,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
