//! Résumé optimization — rewrites résumé LaTeX for a job description through the LLM client.

pub mod handlers;
pub mod prompts;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::optimize::prompts::{OPTIMIZE_PROMPT_TEMPLATE, OPTIMIZE_SYSTEM};

const BEGIN_DOCUMENT: &str = "\\begin{document}";

/// Fills the optimization prompt.
/// The résumé goes in last so placeholder-looking text inside it is never substituted.
pub fn build_prompt(job_description: &str, resume_latex: &str) -> String {
    OPTIMIZE_PROMPT_TEMPLATE
        .replace("{job_description}", job_description.trim())
        .replace("{resume_latex}", resume_latex.trim())
}

/// Rejects model output that cannot stand in for the original document.
fn check_optimized_latex(original: &str, optimized: &str) -> Result<(), String> {
    if optimized.trim().is_empty() {
        return Err("model returned an empty document".to_string());
    }

    if original.contains(BEGIN_DOCUMENT) && !optimized.contains(BEGIN_DOCUMENT) {
        return Err("model output is missing \\begin{document}".to_string());
    }

    Ok(())
}

/// Asks the LLM to tailor `resume_latex` to `job_description`.
pub async fn optimize_resume(
    llm: &LlmClient,
    job_description: &str,
    resume_latex: &str,
) -> Result<String, AppError> {
    let prompt = build_prompt(job_description, resume_latex);

    let optimized = llm
        .complete_text(&prompt, OPTIMIZE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume optimization failed: {e}")))?;

    if let Err(reason) = check_optimized_latex(resume_latex, &optimized) {
        warn!("Discarding optimized resume: {reason}");
        return Err(AppError::Llm(reason));
    }

    info!(
        "Optimized resume: {} → {} bytes",
        resume_latex.len(),
        optimized.len()
    );
    Ok(optimized)
}
