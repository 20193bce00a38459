pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::jobs::handlers as jobs;
use crate::keywords::handlers as keywords;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume analysis
        .route(
            "/api/v1/resume/analyze",
            post(analysis::handle_analyze).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/api/v1/resume/cache",
            delete(analysis::handle_clear_cache),
        )
        // Keywords
        .route(
            "/api/v1/keywords/extract",
            post(keywords::handle_extract_keywords),
        )
        .route(
            "/api/v1/keywords/normalize",
            post(keywords::handle_normalize_keywords),
        )
        // Job recommendations
        .route(
            "/api/v1/jobs/recommendations",
            post(jobs::handle_recommendations),
        )
        .with_state(state)
}
