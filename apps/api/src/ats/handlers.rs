//! Axum route handlers for ATS scoring.

use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ats::{calculate_ats_score, AtsScore};
use crate::errors::AppError;
use crate::validation::{require_text, MAX_TEXT_CHARS};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreRequest {
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreResponse {
    pub success: bool,
    pub score: u8,
    pub keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

/// POST /api/ats-score
///
/// Scores résumé text against a job description.
pub async fn handle_ats_score(
    payload: Result<Json<AtsScoreRequest>, JsonRejection>,
) -> Result<Json<AtsScoreResponse>, AppError> {
    let Json(request) = payload?;
    let resume_text = require_text("resumeText", request.resume_text.as_deref(), MAX_TEXT_CHARS)?;
    let job_description = require_text(
        "jobDescription",
        request.job_description.as_deref(),
        MAX_TEXT_CHARS,
    )?;

    let result = calculate_ats_score(resume_text, job_description)?;
    debug!(
        "ATS score {} ({} matched, {} missing)",
        result.score,
        result.matched_keywords.len(),
        result.missing_keywords.len()
    );

    into_response(result).map(Json)
}

/// Refuses to report a result that fails validation as a success.
fn into_response(result: AtsScore) -> Result<AtsScoreResponse, AppError> {
    result.validate()?;

    Ok(AtsScoreResponse {
        success: true,
        score: result.score,
        keywords: result.matched_keywords,
        missing_keywords: result.missing_keywords,
    })
}
