//! Post store access for the trending service
//!
//! The store is the analyzer's single external collaborator: a queryable
//! collection of posts supporting one filter + fan-out + group + aggregate
//! read. This module provides the trait-based abstraction and two
//! implementations:
//!
//! - [`SqlitePostStore`] - SQLite-backed, tags unnested via `json_each`
//! - [`MemoryPostStore`] - in-memory fold, used as the mock in tests

pub mod posts;

pub use posts::{
    create_memory_store, create_sqlite_store, MemoryPostStore, PostStore, SharedPostStore,
    SqlitePostStore, StoreError, StoreResult,
};
