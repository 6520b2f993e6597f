//! Server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::analytics::{DEFAULT_LIMIT, MAX_LIMIT};

/// Configuration for the trending HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Enable CORS for API
    pub enable_cors: bool,

    /// Enable request logging
    pub enable_request_logging: bool,

    /// Default trending result limit
    pub default_limit: usize,

    /// Store query timeout in seconds
    pub query_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".parse().unwrap(),
            enable_cors: true,
            enable_request_logging: true,
            default_limit: DEFAULT_LIMIT,
            query_timeout_secs: 5,
        }
    }
}

impl ServerConfig {
    /// Create a new config builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit == 0 || self.default_limit > MAX_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "default_limit".to_string(),
                reason: format!("Must be between 1 and {MAX_LIMIT}"),
            });
        }

        if self.query_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "query_timeout_secs".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    bind_address: Option<SocketAddr>,
    enable_cors: Option<bool>,
    enable_request_logging: Option<bool>,
    default_limit: Option<usize>,
    query_timeout_secs: Option<u64>,
}

impl ServerConfigBuilder {
    /// Set bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = Some(addr);
        self
    }

    /// Set bind address from string
    pub fn bind_address_str(mut self, addr: &str) -> Result<Self, ConfigError> {
        self.bind_address = Some(addr.parse().map_err(|_| ConfigError::InvalidValue {
            field: "bind_address".to_string(),
            reason: format!("Invalid address: {addr}"),
        })?);
        Ok(self)
    }

    /// Enable/disable CORS
    pub fn enable_cors(mut self, enable: bool) -> Self {
        self.enable_cors = Some(enable);
        self
    }

    /// Enable/disable request logging
    pub fn enable_request_logging(mut self, enable: bool) -> Self {
        self.enable_request_logging = Some(enable);
        self
    }

    /// Set default trending result limit
    pub fn default_limit(mut self, limit: usize) -> Self {
        self.default_limit = Some(limit);
        self
    }

    /// Set store query timeout in seconds
    pub fn query_timeout_secs(mut self, secs: u64) -> Self {
        self.query_timeout_secs = Some(secs);
        self
    }

    /// Build the config
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let config = ServerConfig {
            bind_address: self
                .bind_address
                .unwrap_or_else(|| "0.0.0.0:8080".parse().unwrap()),
            enable_cors: self.enable_cors.unwrap_or(true),
            enable_request_logging: self.enable_request_logging.unwrap_or(true),
            default_limit: self.default_limit.unwrap_or(DEFAULT_LIMIT),
            query_timeout_secs: self.query_timeout_secs.unwrap_or(5),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_limit, DEFAULT_LIMIT);
        assert!(config.enable_cors);
    }

    #[test]
    fn test_config_builder() {
        let config = ServerConfig::builder()
            .default_limit(20)
            .query_timeout_secs(2)
            .enable_cors(false)
            .build()
            .unwrap();

        assert_eq!(config.default_limit, 20);
        assert_eq!(config.query_timeout_secs, 2);
        assert!(!config.enable_cors);
    }

    #[test]
    fn test_config_validation_fails() {
        let result = ServerConfig::builder().default_limit(0).build();
        assert!(result.is_err());

        let result = ServerConfig::builder().query_timeout_secs(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_builder_with_address() {
        let config = ServerConfig::builder()
            .bind_address_str("127.0.0.1:9000")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.bind_address.port(), 9000);
    }

    #[test]
    fn test_invalid_address_rejected() {
        assert!(ServerConfig::builder().bind_address_str("not-an-addr").is_err());
    }
}
