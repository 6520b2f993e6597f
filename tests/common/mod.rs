// Common test utilities

use chrono::{DateTime, Duration, Utc};
use cowtrends::models::{Post, Visibility};

/// Create a public, active post with the given tags and age in hours
pub fn post(id: &str, tags: &[&str], hours_ago: i64, likes: u64, comments: u64) -> Post {
    post_at(id, tags, Utc::now() - Duration::hours(hours_ago), likes, comments)
}

/// Create a public, active post at an explicit creation time
pub fn post_at(
    id: &str,
    tags: &[&str],
    created_at: DateTime<Utc>,
    likes: u64,
    comments: u64,
) -> Post {
    Post {
        id: id.to_string(),
        author_id: format!("cow-{id}"),
        content: format!("content of {id}"),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        visibility: Visibility::Public,
        is_active: true,
        likes_count: likes,
        comments_count: comments,
        created_at,
    }
}

/// Same as [`post`] but with a non-public visibility
pub fn hidden_post(id: &str, tags: &[&str], hours_ago: i64, visibility: Visibility) -> Post {
    let mut p = post(id, tags, hours_ago, 0, 0);
    p.visibility = visibility;
    p
}

/// Same as [`post`] but soft-deleted
pub fn deleted_post(id: &str, tags: &[&str], hours_ago: i64) -> Post {
    let mut p = post(id, tags, hours_ago, 0, 0);
    p.is_active = false;
    p
}
