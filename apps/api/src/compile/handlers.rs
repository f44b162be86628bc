//! Axum route handlers for LaTeX compilation.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::validation::{require_text, MAX_LATEX_CHARS};

#[derive(Debug, Deserialize)]
pub struct CompileRequest {
    pub code: Option<String>,
}

/// POST /api/compile
///
/// Compiles LaTeX source and returns the PDF inline.
pub async fn handle_compile(
    State(state): State<AppState>,
    payload: Result<Json<CompileRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let code = require_text("code", request.code.as_deref(), MAX_LATEX_CHARS)?;

    let pdf = state.compiler.compile(code).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "inline; filename=\"resume.pdf\""),
        ],
        pdf,
    )
        .into_response())
}
