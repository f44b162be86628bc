// Prompt constants for résumé optimization.

/// System prompt — the answer must be a LaTeX document and nothing else.
pub const OPTIMIZE_SYSTEM: &str = "You are an expert resume writer and LaTeX typesetter. \
    You tailor resumes to job descriptions without inventing experience. \
    You MUST respond with the complete LaTeX document only. \
    Do NOT include any text before or after the document. \
    Do NOT include explanations or apologies.";

/// Optimization prompt template. Replace `{job_description}` and then `{resume_latex}`.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Rewrite the LaTeX resume below so it is a stronger match for the job description.

HARD RULES:
1. Keep the document class, packages, custom macros and section structure exactly as they are
2. Change only the text content: bullet wording, summary, skill ordering
3. The compiled result MUST fit on a single page — never add net length
4. Use only facts already present in the resume — never invent employers, dates, titles or metrics
5. Work relevant job description keywords in naturally where the resume already supports them
6. Escape LaTeX special characters (%, &, $, #, _) in any text you write
7. Return the full document from \documentclass to \end{document}

JOB DESCRIPTION:
{job_description}

CURRENT RESUME (LaTeX):
{resume_latex}"#;
