use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::keywords::{derive_keywords, normalize_keywords, KeywordSet};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractKeywordsRequest {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct NormalizeKeywordsRequest {
    pub text: String,
}

/// POST /api/v1/keywords/extract
pub async fn handle_extract_keywords(
    State(state): State<AppState>,
    Json(req): Json<ExtractKeywordsRequest>,
) -> Result<Json<KeywordSet>, AppError> {
    let keywords = derive_keywords(state.llm.as_ref(), &req.summary, &req.resume_text).await?;
    Ok(Json(keywords))
}

/// POST /api/v1/keywords/normalize
///
/// Manual keyword edits from the user.
pub async fn handle_normalize_keywords(
    Json(req): Json<NormalizeKeywordsRequest>,
) -> Json<KeywordSet> {
    Json(normalize_keywords(&req.text))
}
