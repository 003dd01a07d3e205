use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use super::cache::ChannelCache;
use super::youtube::YouTubeService;

/// Directive for responses backed by a fresh or successfully refreshed record.
const FRESH_CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=600";
/// Directive for stale records served because the refresh failed.
const STALE_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=300";

// ── Application state shared across all routes ─────────────────────────────────

#[derive(Clone)]
pub struct ApiState {
    pub youtube: Arc<YouTubeService>,
    pub cache: Arc<ChannelCache>,
}

// ── Error helpers ─────────────────────────────────────────────────────────────

fn fetch_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "channel_fetch_failed" })),
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "method_not_allowed" })),
    )
        .into_response()
}

// ── Route handlers ────────────────────────────────────────────────────────────

async fn handle_channel(State(state): State<ApiState>) -> Response {
    let youtube = state.youtube.clone();
    let result = state
        .cache
        .get_with(|| async move { youtube.fetch_channel_data().await })
        .await;

    match result {
        Ok((record, from_cache)) => {
            let cache_control = if record.stale.is_some() {
                STALE_CACHE_CONTROL
            } else {
                FRESH_CACHE_CONTROL
            };
            tracing::debug!(
                from_cache,
                stale = record.stale.is_some(),
                "serving channel record"
            );
            ([(header::CACHE_CONTROL, cache_control)], Json(record)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "channel aggregation failed");
            fetch_failed()
        }
    }
}

// ── Router factory ────────────────────────────────────────────────────────────

pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/channel", get(handle_channel).fallback(method_not_allowed))
        .with_state(state);

    Router::new().nest("/api", api).layer(cors)
}
