//! Repository abstraction over the post store
//!
//! Trait-based so the analyzer and the HTTP layer stay decoupled from the
//! storage backend, enabling:
//! - Easy testing with the in-memory implementation
//! - Swappable backends (SQLite today; any store that can express
//!   filter + unnest + group + aggregate fits the same trait)
//!
//! Both implementations run the identical pipeline over posts:
//! filter (public, active, within window, tagged) -> fan out one row per
//! tag -> group by tag -> per-group counts and sums. Group order is the
//! store's natural order (first-post order), which the analyzer's stable
//! sort relies on for tie-breaking.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::models::{Post, TagStat, Visibility};

// ============================================================================
// Errors
// ============================================================================

/// Errors produced by the post store
///
/// There is deliberately a single kind: the query could not be executed
/// (connection failure, malformed row, timeout). An empty result set is a
/// successful outcome and never surfaces here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("post store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    /// Create an unavailability error with a reason
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::unavailable(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Repository Trait
// ============================================================================

/// Read/write access to the post collection
///
/// The trending path uses only [`tag_stats`](PostStore::tag_stats); the
/// remaining operations exist for the seed tool and tests.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post
    async fn insert(&self, post: &Post) -> StoreResult<()>;

    /// Get a post by ID
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Post>>;

    /// Count all posts (any visibility, including inactive)
    async fn count(&self) -> StoreResult<u64>;

    /// Compute per-tag aggregates for the trending window
    ///
    /// Selects posts with `visibility = public`, `is_active = true`,
    /// `created_at >= window_start` and a non-empty tag set, fans each out
    /// once per tag, and groups by tag. `recent_post_count` counts the
    /// subset with `created_at >= recency_cutoff`.
    ///
    /// Returns groups in the store's natural (first-post) order. Zero
    /// matching posts is `Ok(vec![])`.
    async fn tag_stats(
        &self,
        window_start: DateTime<Utc>,
        recency_cutoff: DateTime<Utc>,
    ) -> StoreResult<Vec<TagStat>>;
}

/// Thread-safe shared store handle
pub type SharedPostStore = Arc<dyn PostStore>;

/// Create a shared SQLite store
pub fn create_sqlite_store(path: impl AsRef<Path>) -> StoreResult<SharedPostStore> {
    let store = SqlitePostStore::new(path)?;
    Ok(Arc::new(store))
}

/// Create a shared in-memory store
pub fn create_memory_store() -> SharedPostStore {
    Arc::new(MemoryPostStore::new())
}

// ============================================================================
// Timestamp encoding
// ============================================================================

/// Encode a timestamp as fixed-width RFC 3339 UTC (microseconds, `Z`)
///
/// Fixed width keeps lexicographic string comparison equivalent to
/// chronological comparison, which the range predicates depend on.
fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_ts(s: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::unavailable(format!("invalid timestamp '{s}': {e}")))
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite implementation of [`PostStore`]
///
/// Uses `Mutex` to ensure thread-safety for the SQLite connection. Tags
/// are stored as a JSON array column and unnested with `json_each`, the
/// relational equivalent of a document store's array fan-out stage.
pub struct SqlitePostStore {
    conn: Mutex<Connection>,
}

impl SqlitePostStore {
    /// Open (or create) a SQLite-backed post store
    pub fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::unavailable(format!("cannot create {}: {e}", parent.display())))?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        tracing::info!(path = %path.display(), "SQLite post store initialized");
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Create database schema
    fn create_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS posts (
                    id TEXT PRIMARY KEY,
                    author_id TEXT NOT NULL,
                    content TEXT NOT NULL DEFAULT '',
                    tags TEXT NOT NULL DEFAULT '[]',
                    visibility TEXT NOT NULL DEFAULT 'public',
                    is_active INTEGER NOT NULL DEFAULT 1,
                    likes_count INTEGER NOT NULL DEFAULT 0,
                    comments_count INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_posts_created_at
                    ON posts(created_at);

                CREATE INDEX IF NOT EXISTS idx_posts_visibility
                    ON posts(visibility, is_active);
                "#,
        )?;

        Ok(())
    }
}

#[async_trait]
impl PostStore for SqlitePostStore {
    async fn insert(&self, post: &Post) -> StoreResult<()> {
        let tags_json = serde_json::to_string(&post.tags)
            .map_err(|e| StoreError::unavailable(format!("cannot encode tags: {e}")))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
                INSERT OR REPLACE INTO posts
                    (id, author_id, content, tags, visibility, is_active, likes_count, comments_count, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            params![
                post.id,
                post.author_id,
                post.content,
                tags_json,
                post.visibility.as_str(),
                post.is_active as i64,
                post.likes_count as i64,
                post.comments_count as i64,
                encode_ts(post.created_at),
            ],
        )?;

        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Post>> {
        let conn = self.conn.lock().unwrap();
        let raw = conn
            .query_row(
                r#"
                SELECT id, author_id, content, tags, visibility, is_active,
                       likes_count, comments_count, created_at
                  FROM posts WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, i64>(5)?,
                        row.get::<_, i64>(6)?,
                        row.get::<_, i64>(7)?,
                        row.get::<_, String>(8)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, author_id, content, tags_json, visibility, is_active, likes, comments, created_at)) =
            raw
        else {
            return Ok(None);
        };

        Ok(Some(Post {
            id,
            author_id,
            content,
            tags: serde_json::from_str(&tags_json)
                .map_err(|e| StoreError::unavailable(format!("invalid tags column: {e}")))?,
            visibility: Visibility::parse(&visibility)
                .ok_or_else(|| StoreError::unavailable(format!("invalid visibility '{visibility}'")))?,
            is_active: is_active != 0,
            likes_count: likes as u64,
            comments_count: comments as u64,
            created_at: decode_ts(&created_at)?,
        }))
    }

    async fn count(&self) -> StoreResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    async fn tag_stats(
        &self,
        window_start: DateTime<Utc>,
        recency_cutoff: DateTime<Utc>,
    ) -> StoreResult<Vec<TagStat>> {
        let conn = self.conn.lock().unwrap();

        // filter -> fan-out (json_each) -> group -> aggregate, with group
        // order pinned to first-post order for deterministic ties
        let mut stmt = conn.prepare(
            r#"
                SELECT je.value AS tag,
                       COUNT(*) AS post_count,
                       SUM(CASE WHEN p.created_at >= ?2 THEN 1 ELSE 0 END) AS recent_post_count,
                       SUM(p.likes_count) AS total_likes,
                       SUM(p.comments_count) AS total_comments
                  FROM posts p, json_each(p.tags) AS je
                 WHERE p.visibility = 'public'
                   AND p.is_active = 1
                   AND p.created_at >= ?1
                   AND json_array_length(p.tags) > 0
                 GROUP BY je.value
                 ORDER BY MIN(p.rowid)
                "#,
        )?;

        let stats = stmt
            .query_map(
                params![encode_ts(window_start), encode_ts(recency_cutoff)],
                |row| {
                    Ok(TagStat {
                        tag: row.get(0)?,
                        post_count: row.get::<_, i64>(1)? as u64,
                        recent_post_count: row.get::<_, i64>(2)? as u64,
                        total_likes: row.get::<_, i64>(3)? as u64,
                        total_comments: row.get::<_, i64>(4)? as u64,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(stats)
    }
}

// ============================================================================
// In-Memory Implementation
// ============================================================================

/// In-memory implementation of [`PostStore`]
///
/// Runs the same pipeline as the SQLite backend as a fold over a `Vec`.
/// Doubles as the mock store for tests.
pub struct MemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl MemoryPostStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }

    /// Get the number of stored posts
    pub fn len(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.posts.read().unwrap().is_empty()
    }

    /// Remove all posts
    pub fn clear(&self) {
        self.posts.write().unwrap().clear();
    }
}

impl Default for MemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn insert(&self, post: &Post) -> StoreResult<()> {
        let mut posts = self.posts.write().unwrap();
        if let Some(existing) = posts.iter_mut().find(|p| p.id == post.id) {
            *existing = post.clone();
        } else {
            posts.push(post.clone());
        }
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Post>> {
        let posts = self.posts.read().unwrap();
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.posts.read().unwrap().len() as u64)
    }

    async fn tag_stats(
        &self,
        window_start: DateTime<Utc>,
        recency_cutoff: DateTime<Utc>,
    ) -> StoreResult<Vec<TagStat>> {
        let posts = self.posts.read().unwrap();

        // Group in first-seen order so ties are deterministic
        let mut order: Vec<TagStat> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        let eligible = posts.iter().filter(|p| {
            p.visibility == Visibility::Public
                && p.is_active
                && p.created_at >= window_start
                && !p.tags.is_empty()
        });

        for post in eligible {
            let recent = post.created_at >= recency_cutoff;
            // fan out: one contribution per tag, full counters each time
            for tag in &post.tags {
                let idx = *index.entry(tag.clone()).or_insert_with(|| {
                    order.push(TagStat {
                        tag: tag.clone(),
                        post_count: 0,
                        recent_post_count: 0,
                        total_likes: 0,
                        total_comments: 0,
                    });
                    order.len() - 1
                });

                let stat = &mut order[idx];
                stat.post_count += 1;
                if recent {
                    stat.recent_post_count += 1;
                }
                stat.total_likes += post.likes_count;
                stat.total_comments += post.comments_count;
            }
        }

        Ok(order)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post_at(id: &str, tags: &[&str], hours_ago: i64, likes: u64, comments: u64) -> Post {
        Post {
            id: id.to_string(),
            author_id: "cow-1".to_string(),
            content: format!("post {id}"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            visibility: Visibility::Public,
            is_active: true,
            likes_count: likes,
            comments_count: comments,
            created_at: Utc::now() - Duration::hours(hours_ago),
        }
    }

    fn create_test_stores() -> Vec<Box<dyn PostStore>> {
        vec![
            Box::new(SqlitePostStore::in_memory().unwrap()),
            Box::new(MemoryPostStore::new()),
        ]
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::days(7), now - Duration::hours(24))
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        for store in create_test_stores() {
            let post = post_at("p1", &["grass"], 2, 5, 1);
            store.insert(&post).await.unwrap();

            let loaded = store.get_by_id("p1").await.unwrap().unwrap();
            assert_eq!(loaded.tags, vec!["grass"]);
            assert_eq!(loaded.likes_count, 5);
            assert_eq!(loaded.visibility, Visibility::Public);

            assert!(store.get_by_id("missing").await.unwrap().is_none());
            assert_eq!(store.count().await.unwrap(), 1);
        }
    }

    #[tokio::test]
    async fn test_insert_replaces_by_id() {
        for store in create_test_stores() {
            store.insert(&post_at("p1", &["grass"], 2, 0, 0)).await.unwrap();
            store.insert(&post_at("p1", &["hay"], 2, 3, 0)).await.unwrap();

            assert_eq!(store.count().await.unwrap(), 1);
            let loaded = store.get_by_id("p1").await.unwrap().unwrap();
            assert_eq!(loaded.tags, vec!["hay"]);
        }
    }

    #[tokio::test]
    async fn test_tag_stats_empty_store() {
        for store in create_test_stores() {
            let (w, r) = window();
            let stats = store.tag_stats(w, r).await.unwrap();
            assert!(stats.is_empty());
        }
    }

    #[tokio::test]
    async fn test_tag_stats_filters_and_sums() {
        for store in create_test_stores() {
            // in window, recent
            store.insert(&post_at("p1", &["grass"], 2, 5, 2)).await.unwrap();
            // in window, not recent
            store.insert(&post_at("p2", &["grass"], 6 * 24, 1, 0)).await.unwrap();
            // outside window
            store.insert(&post_at("p3", &["grass"], 8 * 24, 100, 100)).await.unwrap();
            // wrong visibility
            let mut hidden = post_at("p4", &["grass"], 2, 50, 0);
            hidden.visibility = Visibility::Friends;
            store.insert(&hidden).await.unwrap();
            // soft-deleted
            let mut deleted = post_at("p5", &["grass"], 2, 50, 0);
            deleted.is_active = false;
            store.insert(&deleted).await.unwrap();
            // no tags
            store.insert(&post_at("p6", &[], 2, 50, 0)).await.unwrap();

            let (w, r) = window();
            let stats = store.tag_stats(w, r).await.unwrap();

            assert_eq!(stats.len(), 1);
            let grass = &stats[0];
            assert_eq!(grass.tag, "grass");
            assert_eq!(grass.post_count, 2);
            assert_eq!(grass.recent_post_count, 1);
            assert_eq!(grass.total_likes, 6);
            assert_eq!(grass.total_comments, 2);
        }
    }

    #[tokio::test]
    async fn test_tag_stats_fan_out() {
        for store in create_test_stores() {
            // one post with three tags contributes its full counters to each group
            store
                .insert(&post_at("p1", &["a", "b", "c"], 2, 4, 3))
                .await
                .unwrap();

            let (w, r) = window();
            let stats = store.tag_stats(w, r).await.unwrap();

            assert_eq!(stats.len(), 3);
            for stat in &stats {
                assert_eq!(stat.post_count, 1);
                assert_eq!(stat.recent_post_count, 1);
                assert_eq!(stat.total_likes, 4);
                assert_eq!(stat.total_comments, 3);
            }
        }
    }

    #[tokio::test]
    async fn test_tag_stats_natural_order_is_first_seen() {
        for store in create_test_stores() {
            store.insert(&post_at("p1", &["zebra"], 3, 0, 0)).await.unwrap();
            store.insert(&post_at("p2", &["apple"], 2, 0, 0)).await.unwrap();
            store.insert(&post_at("p3", &["zebra", "mango"], 1, 0, 0)).await.unwrap();

            let (w, r) = window();
            let stats = store.tag_stats(w, r).await.unwrap();

            let tags: Vec<&str> = stats.iter().map(|s| s.tag.as_str()).collect();
            assert_eq!(tags, vec!["zebra", "apple", "mango"]);
        }
    }

    #[tokio::test]
    async fn test_recent_invariant() {
        for store in create_test_stores() {
            store.insert(&post_at("p1", &["grass"], 2, 0, 0)).await.unwrap();
            store.insert(&post_at("p2", &["grass"], 30, 0, 0)).await.unwrap();
            store.insert(&post_at("p3", &["grass"], 100, 0, 0)).await.unwrap();

            let (w, r) = window();
            let stats = store.tag_stats(w, r).await.unwrap();
            assert!(stats[0].recent_post_count <= stats[0].post_count);
        }
    }

    #[tokio::test]
    async fn test_memory_store_utilities() {
        let store = MemoryPostStore::new();
        assert!(store.is_empty());

        store.insert(&post_at("p1", &["grass"], 2, 0, 0)).await.unwrap();
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_shared_store_creation() {
        let store = create_memory_store();
        store.insert(&post_at("p1", &["grass"], 2, 0, 0)).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let now = Utc::now();
        let encoded = encode_ts(now);
        let decoded = decode_ts(&encoded).unwrap();
        // microsecond precision is preserved
        assert_eq!(encoded, encode_ts(decoded));
    }

    #[test]
    fn test_timestamp_fixed_width_ordering() {
        let early = Utc::now();
        let late = early + Duration::microseconds(1);
        assert!(encode_ts(early) < encode_ts(late));
        assert_eq!(encode_ts(early).len(), encode_ts(late).len());
    }
}
