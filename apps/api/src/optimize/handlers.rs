//! Axum route handlers for résumé optimization.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::optimize::optimize_resume;
use crate::state::AppState;
use crate::validation::{require_text, MAX_LATEX_CHARS, MAX_TEXT_CHARS};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub job_description: Option<String>,
    pub resume_latex: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub success: bool,
    pub optimized_latex: String,
}

/// POST /api/optimize
///
/// Rewrites résumé LaTeX to better match a job description.
pub async fn handle_optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let Json(request) = payload?;
    let job_description = require_text(
        "jobDescription",
        request.job_description.as_deref(),
        MAX_TEXT_CHARS,
    )?;
    let resume_latex = require_text(
        "resumeLatex",
        request.resume_latex.as_deref(),
        MAX_LATEX_CHARS,
    )?;

    let optimized_latex = optimize_resume(&state.llm, job_description, resume_latex).await?;

    Ok(Json(OptimizeResponse {
        success: true,
        optimized_latex,
    }))
}
