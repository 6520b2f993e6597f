//! cowtrends - Trending Hashtag Analytics for the Cow Social Network
//!
//! A stateless service that computes the top trending hashtags over a
//! trailing 7-day window, scoring tags by post volume, recent activity,
//! and engagement.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and types
//! - [`store`] - Post store access (SQLite, in-memory)
//! - [`analytics`] - Trending computation (scoring, ranking, labels)
//! - [`server`] - HTTP API server
//! - [`metrics`] - Prometheus metrics
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use cowtrends::analytics::TrendingTagAnalyzer;
//! use cowtrends::store::create_memory_store;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let analyzer = TrendingTagAnalyzer::new(create_memory_store());
//!     let top = analyzer.trending(None).await?;
//!     assert!(top.is_empty());
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod commands;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod server;
pub mod store;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{TrendingConfig, TrendingTagAnalyzer};
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{Post, TagStat, TrendLabel, TrendingTag, Visibility};
    pub use crate::store::{
        create_memory_store, create_sqlite_store, MemoryPostStore, PostStore, SharedPostStore,
        SqlitePostStore, StoreError,
    };
}

// Direct re-exports for convenience
pub use models::{Post, TagStat, TrendLabel, TrendingTag, Visibility};
