use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::jobs::recommend::{fetch_recommendations, RecommendationRequest, RecommendationResponse};
use crate::state::AppState;

/// POST /api/v1/jobs/recommendations
///
/// Provider failures are reported per provider inside a 200 response; only an
/// invalid request fails the whole call.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let response =
        fetch_recommendations(state.linkedin.as_ref(), state.naukri.as_ref(), &request).await?;
    Ok(Json(response))
}
