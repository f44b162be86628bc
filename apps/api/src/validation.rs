//! Request field validation shared by the API handlers.

use crate::errors::AppError;

/// Upper bound for résumé text and job descriptions.
pub const MAX_TEXT_CHARS: usize = 50_000;
/// Upper bound for LaTeX sources.
pub const MAX_LATEX_CHARS: usize = 100_000;

/// Returns the field value if it is present, non-blank and within `max_chars`.
pub fn require_text<'a>(
    field: &str,
    value: Option<&'a str>,
    max_chars: usize,
) -> Result<&'a str, AppError> {
    let value = value.ok_or_else(|| AppError::Validation(format!("{field} is required")))?;

    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }

    if value.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{field} exceeds the maximum length of {max_chars} characters"
        )));
    }

    Ok(value)
}
