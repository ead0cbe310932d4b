//! Axum route handlers for the Comparison API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::extraction::extract_text_from_pdf;
use crate::matching::comparator::ComparisonResult;
use crate::state::AppState;

pub const EXTRACTION_FAILED: &str =
    "Failed to extract text from one or both resumes. Please ensure they are text-based PDFs.";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompareTextRequest {
    pub job_description: String,
    pub resume_a: String,
    pub resume_b: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/compare
///
/// Multipart upload: `resume_a` and `resume_b` PDF files plus a
/// `job_description` text field. Unknown fields are ignored.
pub async fn handle_compare_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ComparisonResult>, AppError> {
    let mut resume_a: Option<Bytes> = None;
    let mut resume_b: Option<Bytes> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume_a" => resume_a = Some(field.bytes().await.map_err(invalid_multipart)?),
            "resume_b" => resume_b = Some(field.bytes().await.map_err(invalid_multipart)?),
            "job_description" => {
                job_description = Some(field.text().await.map_err(invalid_multipart)?)
            }
            _ => {}
        }
    }

    let resume_a = resume_a.ok_or_else(|| missing_field("resume_a"))?;
    let resume_b = resume_b.ok_or_else(|| missing_field("resume_b"))?;
    let job_description = job_description.ok_or_else(|| missing_field("job_description"))?;
    require_job_description(&job_description)?;

    let text_a = extract_text_from_pdf(resume_a).await;
    let text_b = extract_text_from_pdf(resume_b).await;
    if text_a.is_empty() || text_b.is_empty() {
        return Err(AppError::UnprocessableEntity(EXTRACTION_FAILED.to_string()));
    }

    let result = state
        .comparator
        .compare(&job_description, &text_a, &text_b)
        .await?;

    Ok(Json(result))
}

/// POST /api/v1/compare/text
///
/// Same comparison for callers that already extracted the résumé text.
pub async fn handle_compare_text(
    State(state): State<AppState>,
    Json(request): Json<CompareTextRequest>,
) -> Result<Json<ComparisonResult>, AppError> {
    require_job_description(&request.job_description)?;
    if request.resume_a.trim().is_empty() || request.resume_b.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "resume_a and resume_b must both contain text".to_string(),
        ));
    }

    let result = state
        .comparator
        .compare(&request.job_description, &request.resume_a, &request.resume_b)
        .await?;

    Ok(Json(result))
}

fn require_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn missing_field(name: &str) -> AppError {
    AppError::Validation(format!("{name} is required"))
}

fn invalid_multipart(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}
