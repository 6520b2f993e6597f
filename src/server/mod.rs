//! HTTP server exposing the trending API
//!
//! This module provides the read-only HTTP surface of the service:
//!
//! - `GET /api/trending` - ranked trending hashtags
//! - `GET /api/health`   - liveness/status
//! - `GET /metrics`      - Prometheus exposition
//!
//! The analyzer is stateless, so the server needs no coordination between
//! requests: every handler invocation is an independent read.

pub mod api;
pub mod config;
pub mod server;

pub use api::{create_router, ApiResponse, ErrorResponse, HealthResponse, TrendingEntry};
pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
pub use server::{AppState, ServerError, ServerInfo, TrendingServer};
