// Core data structures for the cowtrends service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post visibility levels
///
/// Only `Public` posts are eligible for trending computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Friends,
    Private,
}

impl Visibility {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Friends => "friends",
            Self::Private => "private",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(Self::Public),
            "friends" => Some(Self::Friends),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    /// Get all visibility levels
    pub fn all() -> Vec<Self> {
        vec![Self::Public, Self::Friends, Self::Private]
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A post in the social network
///
/// Owned by the post store; the trending analyzer only ever reads these.
/// `tags` holds lowercase hashtags without the leading `#` and may be
/// empty. `is_active` is the soft-delete flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub visibility: Visibility,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Post {
    /// Create a new public, active post with a generated ID
    pub fn new(author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author_id: author_id.into(),
            content: content.into(),
            tags: Vec::new(),
            visibility: Visibility::Public,
            is_active: true,
            likes_count: 0,
            comments_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Attach tags, normalizing each one; invalid tags are dropped
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .filter_map(|t| crate::utils::normalize_tag(t.as_ref()))
            .collect();
        self
    }

    /// Total engagement on this single post
    pub fn engagement(&self) -> u64 {
        self.likes_count + self.comments_count
    }
}

/// Per-tag aggregate over one trending window
///
/// Produced by the store's filter/fan-out/group query and consumed by the
/// analyzer. Transient: recomputed on every request, never persisted.
/// Invariant: `recent_post_count <= post_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStat {
    /// The hashtag, unique within one result set
    pub tag: String,

    /// Eligible posts carrying this tag within the window
    pub post_count: u64,

    /// Subset of `post_count` created within the recency cutoff
    pub recent_post_count: u64,

    /// Sum of likes across all eligible posts carrying this tag
    pub total_likes: u64,

    /// Sum of comments across all eligible posts carrying this tag
    pub total_comments: u64,
}

impl TagStat {
    /// Combined engagement: likes plus comments
    pub fn engagement(&self) -> u64 {
        self.total_likes + self.total_comments
    }
}

/// Trend classification for a ranked tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendLabel {
    #[serde(rename = "HOT")]
    Hot,
    #[serde(rename = "RISING")]
    Rising,
}

impl TrendLabel {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "HOT",
            Self::Rising => "RISING",
        }
    }
}

impl std::fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in the ranked trending result
///
/// `growth_display` is the rounded percentage shown to clients; the raw
/// growth rate is not carried past classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingTag {
    pub tag: String,
    pub post_count: u64,
    pub label: TrendLabel,
    pub growth_display: u32,
    pub engagement: u64,
    pub recent_post_count: u64,
}

impl TrendingTag {
    /// Growth formatted for the wire: `"+{n}%"`
    pub fn growth_formatted(&self) -> String {
        format!("+{}%", self.growth_display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_string_roundtrip() {
        for vis in Visibility::all() {
            let s = vis.as_str();
            assert_eq!(Visibility::parse(s), Some(vis));
        }
    }

    #[test]
    fn test_visibility_parse_invalid() {
        assert!(Visibility::parse("everyone").is_none());
        assert!(Visibility::parse("").is_none());
    }

    #[test]
    fn test_visibility_serde_lowercase() {
        let json = serde_json::to_string(&Visibility::Friends).unwrap();
        assert_eq!(json, r#""friends""#);
        let parsed: Visibility = serde_json::from_str(r#""public""#).unwrap();
        assert_eq!(parsed, Visibility::Public);
    }

    #[test]
    fn test_post_defaults() {
        let post = Post::new("moo-1", "hello pasture");
        assert_eq!(post.visibility, Visibility::Public);
        assert!(post.is_active);
        assert!(post.tags.is_empty());
        assert_eq!(post.engagement(), 0);
        assert_eq!(post.id.len(), 36); // UUID v4 string form
    }

    #[test]
    fn test_post_with_tags_normalizes() {
        let post = Post::new("moo-1", "").with_tags(["#Grass", "HAY", "  ", "#milk!"]);
        assert_eq!(post.tags, vec!["grass", "hay"]);
    }

    #[test]
    fn test_post_deserialize_minimal() {
        // Seed files may omit counters and flags
        let json = r#"{
            "id": "p1",
            "author_id": "a1",
            "visibility": "public",
            "created_at": "2026-08-01T12:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(post.is_active);
        assert_eq!(post.likes_count, 0);
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_tag_stat_engagement() {
        let stat = TagStat {
            tag: "grass".to_string(),
            post_count: 4,
            recent_post_count: 2,
            total_likes: 10,
            total_comments: 5,
        };
        assert_eq!(stat.engagement(), 15);
    }

    #[test]
    fn test_trend_label_serde() {
        assert_eq!(serde_json::to_string(&TrendLabel::Hot).unwrap(), r#""HOT""#);
        assert_eq!(
            serde_json::to_string(&TrendLabel::Rising).unwrap(),
            r#""RISING""#
        );
    }

    #[test]
    fn test_growth_formatted() {
        let tag = TrendingTag {
            tag: "grass".to_string(),
            post_count: 2,
            label: TrendLabel::Rising,
            growth_display: 50,
            engagement: 8,
            recent_post_count: 1,
        };
        assert_eq!(tag.growth_formatted(), "+50%");
    }
}
