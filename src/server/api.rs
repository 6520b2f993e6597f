//! REST API handlers for the trending server
//!
//! This module defines the API routes and handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::metrics;
use crate::models::TrendingTag;

use super::server::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// One trending entry on the wire
///
/// External field names are part of the client contract and differ from
/// the internal model: `tag` -> `hashtag`, `post_count` -> `count`,
/// `label` -> `trend`, `growth_display` -> `growth` (`"+{n}%"`),
/// `recent_post_count` -> `recentActivity`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub hashtag: String,
    pub count: u64,
    pub trend: String,
    pub growth: String,
    pub engagement: u64,
    #[serde(rename = "recentActivity")]
    pub recent_activity: u64,
}

impl From<TrendingTag> for TrendingEntry {
    fn from(tag: TrendingTag) -> Self {
        Self {
            growth: tag.growth_formatted(),
            hashtag: tag.tag,
            count: tag.post_count,
            trend: tag.label.as_str().to_string(),
            engagement: tag.engagement,
            recent_activity: tag.recent_post_count,
        }
    }
}

/// Query parameters for the trending endpoint
///
/// `limit` is accepted as a raw string so malformed values default
/// silently instead of producing a 400.
#[derive(Debug, Default, Deserialize)]
pub struct TrendingParams {
    pub limit: Option<String>,
}

impl TrendingParams {
    /// Parse the limit leniently; anything non-positive or unparsable is None
    fn effective_limit(&self) -> Option<usize> {
        self.limit
            .as_deref()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
    }
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/trending", get(get_trending))
        .route("/api/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Trending hashtags endpoint
///
/// Returns the ranked sequence as a bare JSON array. An empty window is a
/// 200 with `[]`; a store failure is a 503 and never a partial result.
async fn get_trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> axum::response::Response {
    let started = Instant::now();
    metrics::record_trending_query();

    let result = state.analyzer.trending(params.effective_limit()).await;

    let response = match result {
        Ok(tags) => {
            if tags.is_empty() {
                metrics::record_empty_result();
            }
            let entries: Vec<TrendingEntry> = tags.into_iter().map(TrendingEntry::from).collect();
            metrics::record_api_request("/api/trending", StatusCode::OK.as_u16());
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Trending computation failed");
            metrics::record_store_error();
            metrics::record_api_request(
                "/api/trending",
                StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    };

    metrics::observe_api_duration("/api/trending", started.elapsed().as_secs_f64());
    response
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    metrics::record_api_request("/api/health", StatusCode::OK.as_u16());
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
    }))
}

/// Prometheus metrics endpoint
async fn get_metrics() -> impl IntoResponse {
    metrics::render()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrendLabel;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        assert!(response.success);
        assert!(response.data.is_some());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_error_response() {
        let response = ErrorResponse::new("test error");
        assert!(!response.success);
        assert_eq!(response.error, "test error");
    }

    #[test]
    fn test_trending_entry_field_names() {
        let entry = TrendingEntry::from(TrendingTag {
            tag: "grass".to_string(),
            post_count: 3,
            label: TrendLabel::Hot,
            growth_display: 75,
            engagement: 22,
            recent_post_count: 2,
        });

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["hashtag"], "grass");
        assert_eq!(json["count"], 3);
        assert_eq!(json["trend"], "HOT");
        assert_eq!(json["growth"], "+75%");
        assert_eq!(json["engagement"], 22);
        assert_eq!(json["recentActivity"], 2);
    }

    #[test]
    fn test_trending_params_lenient_limit() {
        let parse = |limit: Option<&str>| TrendingParams {
            limit: limit.map(String::from),
        }
        .effective_limit();

        assert_eq!(parse(None), None);
        assert_eq!(parse(Some("5")), Some(5));
        assert_eq!(parse(Some("0")), None);
        assert_eq!(parse(Some("-3")), None);
        assert_eq!(parse(Some("abc")), None);
    }
}
