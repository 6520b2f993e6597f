use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::analytics::TrendingTagAnalyzer;
use crate::config::Config;
use crate::server::TrendingEntry;
use crate::store::create_sqlite_store;

/// Compute trending hashtags once and print them
///
/// Analyzer settings (default limit, query timeout) come from the
/// environment configuration. `at` pins the reference time (RFC 3339)
/// for reproducible output; otherwise wall-clock now is used.
pub async fn trending(
    database: String,
    limit: Option<usize>,
    at: Option<String>,
    json: bool,
) -> Result<()> {
    let config = Config::from_env()?;
    config.validate()?;

    let store = create_sqlite_store(&database)
        .with_context(|| format!("Failed to open post store at {database}"))?;

    let analyzer = TrendingTagAnalyzer::with_config(store, config.trending_config());

    let reference = match at {
        Some(ref raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("Invalid --at timestamp: {raw}"))?,
        None => Utc::now(),
    };

    let tags = analyzer
        .trending_at(reference, limit)
        .await
        .context("Trending computation failed")?;

    if json {
        let entries: Vec<TrendingEntry> = tags.into_iter().map(TrendingEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if tags.is_empty() {
        println!("No trending hashtags in the current window.");
        return Ok(());
    }

    println!(
        "{:<4} {:<24} {:>6} {:>7} {:>11} {:<7} {:>7}",
        "#", "hashtag", "posts", "recent", "engagement", "trend", "growth"
    );
    println!("{:-<72}", "");
    for (i, tag) in tags.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:>6} {:>7} {:>11} {:<7} {:>7}",
            i + 1,
            tag.tag,
            tag.post_count,
            tag.recent_post_count,
            tag.engagement,
            tag.label.as_str(),
            tag.growth_formatted(),
        );
    }

    Ok(())
}
