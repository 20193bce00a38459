//! Axum route handlers for the Resume Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;
use crate::state::AppState;

/// Multipart field carrying the resume PDF.
const FILE_FIELD: &str = "file";

/// POST /api/v1/resume/analyze
///
/// Accepts a multipart upload with the PDF in the `file` field and returns the
/// summary / gaps / roadmap analysis. Per-field LLM failures come back inline
/// as marker strings, never as an error response.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let limit = state.config.max_upload_bytes;
    let mut resume: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, limit))?
    {
        if field.name() == Some(FILE_FIELD) {
            resume = Some(field.bytes().await.map_err(|e| upload_error(e, limit))?);
        }
    }

    let resume = resume
        .ok_or_else(|| AppError::Validation("Upload your resume (PDF) to get started.".to_string()))?;
    if resume.is_empty() {
        return Err(AppError::EmptyInput("Uploaded file empty.".to_string()));
    }

    info!("Analyzing resume upload ({} bytes)", resume.len());
    let analysis = state.analyzer.analyze(&resume).await;

    Ok(Json(analysis.as_ref().clone()))
}

/// Body-limit rejections become 413; anything else is a malformed upload.
fn upload_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!(
            "Uploaded file exceeds the {limit} byte size limit."
        ));
    }
    AppError::Validation(format!("Invalid file upload: {}", e.body_text()))
}

/// DELETE /api/v1/resume/cache
///
/// Invalidation boundary for the analysis cache: the next upload of any resume
/// is analyzed again.
pub async fn handle_clear_cache(State(state): State<AppState>) -> StatusCode {
    let cached = state.analyzer.cache().len();
    state.analyzer.cache().clear();
    info!("Cleared {cached} cached resume analyses");
    StatusCode::NO_CONTENT
}
