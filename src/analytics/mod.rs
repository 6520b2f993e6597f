//! Analytics module for trending-hashtag computation

pub mod trending;

pub use trending::{
    classify, growth_rate, rank, trend_score, TrendingConfig, TrendingTagAnalyzer, DEFAULT_LIMIT,
    MAX_LIMIT, RECENT_HOURS, WINDOW_DAYS,
};
