//! Trending hashtag computation
//!
//! This module provides functionality for:
//! - Computing the trailing trending window and recency cutoff
//! - Scoring per-tag aggregates with a composite recency/engagement score
//! - Ranking, truncating, and classifying tags into trend labels
//!
//! The pipeline order is fixed: filter -> fan-out -> group (store side),
//! then score -> sort -> limit -> classify (here). Reordering the filter
//! and fan-out stages changes which posts are excluded, so the store
//! contract in [`crate::store::PostStore::tag_stats`] owns the first
//! three stages verbatim.
//!
//! Each invocation is a pure read: no caching, no shared mutable state,
//! safe to call concurrently from any number of request handlers.

use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::time::Duration as StdDuration;

use crate::models::{TagStat, TrendLabel, TrendingTag};
use crate::store::{SharedPostStore, StoreError, StoreResult};

/// Trailing eligibility window, in days
pub const WINDOW_DAYS: i64 = 7;

/// Recency cutoff used for the freshness signal, in hours
pub const RECENT_HOURS: i64 = 24;

/// Default number of results when the caller does not specify a limit
pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound on the requested result limit
pub const MAX_LIMIT: usize = 100;

// Score weights: a recent post counts 3x a generic post; engagement at
// half value per interaction so a single viral post cannot dominate on
// volume alone.
const POST_WEIGHT: f64 = 1.0;
const RECENT_WEIGHT: f64 = 3.0;
const ENGAGEMENT_WEIGHT: f64 = 0.5;

// Growth display is capped below 100%.
const GROWTH_CAP: f64 = 99.0;

// Classification thresholds.
const HOT_GROWTH: f64 = 50.0;
const HOT_ENGAGEMENT: u64 = 20;
const LOW_GROWTH: f64 = 10.0;
const LOW_GROWTH_FLOOR: f64 = 5.0;

// ============================================================================
// Configuration
// ============================================================================

/// Tunables for the trending analyzer
#[derive(Debug, Clone)]
pub struct TrendingConfig {
    /// Result limit applied when the caller passes none
    pub default_limit: usize,

    /// Deadline for the store aggregation query
    pub query_timeout: StdDuration,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            query_timeout: StdDuration::from_secs(5),
        }
    }
}

// ============================================================================
// Scoring
// ============================================================================

/// Composite trend score for one tag group
///
/// `post_count * 1 + recent_post_count * 3 + engagement * 0.5`
#[must_use]
pub fn trend_score(stat: &TagStat) -> f64 {
    stat.post_count as f64 * POST_WEIGHT
        + stat.recent_post_count as f64 * RECENT_WEIGHT
        + stat.engagement() as f64 * ENGAGEMENT_WEIGHT
}

/// Growth percentage for one tag group, capped at 99
///
/// Zero when there is no recent activity at all.
#[must_use]
pub fn growth_rate(stat: &TagStat) -> f64 {
    if stat.recent_post_count > 0 && stat.post_count > 0 {
        ((stat.recent_post_count as f64 / stat.post_count as f64) * 100.0).min(GROWTH_CAP)
    } else {
        0.0
    }
}

/// Classify a group into a trend label and displayed growth percentage
///
/// Decision order:
/// - growth > 50 or engagement > 20 -> `HOT`, displayed growth as-is
/// - growth < 10 -> `RISING`, displayed growth floored at 5
/// - otherwise -> `RISING`, displayed growth as-is
///
/// The last two branches share a label and differ only in the display
/// floor; they stay separate so the floor applies to low-growth tags only.
#[must_use]
pub fn classify(growth: f64, engagement: u64) -> (TrendLabel, u32) {
    if growth > HOT_GROWTH || engagement > HOT_ENGAGEMENT {
        (TrendLabel::Hot, growth.round() as u32)
    } else if growth < LOW_GROWTH {
        (TrendLabel::Rising, growth.max(LOW_GROWTH_FLOOR).round() as u32)
    } else {
        (TrendLabel::Rising, growth.round() as u32)
    }
}

/// Score, sort, truncate, and classify tag groups
///
/// Sort is stable and descending by [`trend_score`], so equal scores keep
/// the store's natural group order.
#[must_use]
pub fn rank(mut stats: Vec<TagStat>, limit: usize) -> Vec<TrendingTag> {
    stats.sort_by(|a, b| {
        trend_score(b)
            .partial_cmp(&trend_score(a))
            .unwrap_or(Ordering::Equal)
    });
    stats.truncate(limit);

    stats
        .into_iter()
        .map(|stat| {
            let engagement = stat.engagement();
            let (label, growth_display) = classify(growth_rate(&stat), engagement);
            TrendingTag {
                tag: stat.tag,
                post_count: stat.post_count,
                label,
                growth_display,
                engagement,
                recent_post_count: stat.recent_post_count,
            }
        })
        .collect()
}

/// Resolve the caller-supplied limit to a positive, bounded value
///
/// Missing or zero limits fall back to `default`; oversized limits are
/// clamped. Never an error.
fn effective_limit(requested: Option<usize>, default: usize) -> usize {
    requested.filter(|n| *n > 0).unwrap_or(default).min(MAX_LIMIT)
}

// ============================================================================
// Analyzer
// ============================================================================

/// Computes the top-N trending hashtags over the trailing window
///
/// Stateless between invocations; cloning shares the underlying store
/// handle, so one analyzer can serve any number of concurrent requests.
#[derive(Clone)]
pub struct TrendingTagAnalyzer {
    store: SharedPostStore,
    config: TrendingConfig,
}

impl TrendingTagAnalyzer {
    /// Create an analyzer with default configuration
    pub fn new(store: SharedPostStore) -> Self {
        Self::with_config(store, TrendingConfig::default())
    }

    /// Create an analyzer with explicit configuration
    pub fn with_config(store: SharedPostStore, config: TrendingConfig) -> Self {
        Self { store, config }
    }

    /// Get the analyzer configuration
    pub fn config(&self) -> &TrendingConfig {
        &self.config
    }

    /// Compute trending tags as of now
    pub async fn trending(&self, limit: Option<usize>) -> StoreResult<Vec<TrendingTag>> {
        self.trending_at(Utc::now(), limit).await
    }

    /// Compute trending tags as of an explicit reference time
    ///
    /// The deterministic entry point used by tests and backfills. Fails
    /// with [`StoreError::Unavailable`] when the store query errors or
    /// exceeds the configured deadline; an empty window is a successful
    /// empty result.
    pub async fn trending_at(
        &self,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<TrendingTag>> {
        let window_start = now - Duration::days(WINDOW_DAYS);
        let recency_cutoff = now - Duration::hours(RECENT_HOURS);

        let stats = match tokio::time::timeout(
            self.config.query_timeout,
            self.store.tag_stats(window_start, recency_cutoff),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(StoreError::unavailable(format!(
                    "aggregation query timed out after {:?}",
                    self.config.query_timeout
                )))
            }
        };

        tracing::debug!(
            groups = stats.len(),
            window_start = %window_start,
            recency_cutoff = %recency_cutoff,
            "tag aggregation complete"
        );

        let limit = effective_limit(limit, self.config.default_limit);
        Ok(rank(stats, limit))
    }
}

// ============================================================================
// Tests
// ============================================================================
