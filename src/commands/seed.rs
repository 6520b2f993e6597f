use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Post;
use crate::store::create_sqlite_store;
use crate::utils::normalize_tags;

/// Load posts from a JSON file into a SQLite post store
///
/// The input is a JSON array of posts. Tags are normalized on the way in
/// (lowercased, `#` stripped, invalid entries dropped) so the stored data
/// matches what the aggregation expects.
pub async fn seed(database: String, input: String) -> Result<()> {
    let posts = read_posts(Path::new(&input))
        .with_context(|| format!("Failed to read seed file {input}"))?;

    println!("Seeding post store");
    println!("==================");
    println!("  Database: {database}");
    println!("  Input: {input}");
    println!("  Posts in file: {}", posts.len());
    println!();

    let store = create_sqlite_store(&database)
        .with_context(|| format!("Failed to open post store at {database}"))?;

    let mut inserted = 0usize;
    for post in &posts {
        store
            .insert(post)
            .await
            .with_context(|| format!("Failed to insert post {}", post.id))?;
        inserted += 1;
    }

    let total = store.count().await.context("Failed to count posts")?;

    println!("Inserted {inserted} posts ({total} total in store).");
    Ok(())
}

/// Read and normalize posts from a JSON seed file
fn read_posts(path: &Path) -> Result<Vec<Post>> {
    let content = std::fs::read_to_string(path)?;
    let mut posts: Vec<Post> = serde_json::from_str(&content).context("Invalid seed JSON")?;

    for post in &mut posts {
        post.tags = normalize_tags(post.tags.iter());
    }

    Ok(posts)
}
