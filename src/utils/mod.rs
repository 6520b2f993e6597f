//! Common utilities and helper functions
//!
//! This module provides shared helpers used across the application.

use regex::Regex;
use std::sync::OnceLock;

/// Normalize a raw hashtag into canonical stored form
///
/// Strips a leading `#`, trims whitespace, and lowercases. Returns `None`
/// when the remainder is not a valid tag (letters, digits and underscores
/// only, 1..=64 chars).
pub fn normalize_tag(raw: &str) -> Option<String> {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();

    let re = TAG_RE.get_or_init(|| Regex::new(r"^[\p{L}\p{N}_]{1,64}$").expect("Invalid regex pattern"));

    let candidate = raw.trim().trim_start_matches('#').to_lowercase();

    if re.is_match(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

/// Normalize a list of raw hashtags, dropping invalid entries and duplicates
///
/// Order of first appearance is preserved.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    raw.into_iter()
        .filter_map(|t| normalize_tag(t.as_ref()))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag_basic() {
        assert_eq!(normalize_tag("#Grass"), Some("grass".to_string()));
        assert_eq!(normalize_tag("HAY"), Some("hay".to_string()));
        assert_eq!(normalize_tag("  #winter_feed "), Some("winter_feed".to_string()));
    }

    #[test]
    fn test_normalize_tag_rejects_invalid() {
        assert_eq!(normalize_tag(""), None);
        assert_eq!(normalize_tag("#"), None);
        assert_eq!(normalize_tag("two words"), None);
        assert_eq!(normalize_tag("milk!"), None);
    }

    #[test]
    fn test_normalize_tag_unicode() {
        assert_eq!(normalize_tag("#소"), Some("소".to_string()));
    }

    #[test]
    fn test_normalize_tags_dedup_preserves_order() {
        let tags = normalize_tags(["#b", "#a", "B", "bad tag", "#a"]);
        assert_eq!(tags, vec!["b", "a"]);
    }
}
