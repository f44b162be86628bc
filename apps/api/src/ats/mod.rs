//! ATS scoring — measures how well résumé text covers a job description's keywords.
//!
//! Pipeline: `tokenize` → `normalize` → `extract_keywords` → `score_keywords`.
//! Every stage is a pure function; `calculate_ats_score` validates input and composes them.
//!
//! Matching policy: case-insensitive exact token match on the plural-collapsed key.
//! No synonyms, no substring matches.

pub mod handlers;
pub mod keywords;
pub mod tokenize;

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use self::keywords::{extract_keywords, KeywordSet};
use self::tokenize::{normalize, tokenize};

#[derive(Debug, Error)]
pub enum AtsError {
    /// Caller supplied a blank field.
    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },

    /// The scorer produced a result that failed its own consistency checks.
    #[error("ATS scoring produced an invalid result: {0}")]
    Internal(String),
}

/// Result of scoring a résumé against a job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScore {
    /// 0 – 100
    pub score: u8,
    /// Candidate keywords found in the résumé, in job-description order.
    pub matched_keywords: Vec<String>,
    /// Candidate keywords absent from the résumé, in job-description order.
    pub missing_keywords: Vec<String>,
}

impl AtsScore {
    /// Checks the invariants callers rely on before trusting a result.
    pub fn validate(&self) -> Result<(), AtsError> {
        if self.score > 100 {
            return Err(AtsError::Internal(format!(
                "score {} outside 0..=100",
                self.score
            )));
        }

        let matched: HashSet<&str> = self.matched_keywords.iter().map(String::as_str).collect();
        if matched.len() != self.matched_keywords.len() {
            return Err(AtsError::Internal(
                "duplicate matched keywords".to_string(),
            ));
        }
        if let Some(dup) = self
            .missing_keywords
            .iter()
            .find(|k| matched.contains(k.as_str()))
        {
            return Err(AtsError::Internal(format!(
                "keyword '{dup}' is both matched and missing"
            )));
        }

        Ok(())
    }
}

/// Scores résumé text against a job description.
///
/// Blank inputs are rejected with `AtsError::EmptyInput`. A job description
/// with no candidate keywords scores 0. Callers check `AtsScore::validate`
/// before forwarding the result.
pub fn calculate_ats_score(resume_text: &str, job_description: &str) -> Result<AtsScore, AtsError> {
    if resume_text.trim().is_empty() {
        return Err(AtsError::EmptyInput { field: "resumeText" });
    }
    if job_description.trim().is_empty() {
        return Err(AtsError::EmptyInput {
            field: "jobDescription",
        });
    }

    let keywords = extract_keywords(job_description);
    Ok(score_keywords(&keywords, resume_text))
}

/// Matches a keyword set against résumé text.
///
/// `score = round(matched / candidates × 100)`, clamped to 0..=100.
/// An empty keyword set scores 0 with nothing matched.
pub fn score_keywords(keywords: &KeywordSet, resume_text: &str) -> AtsScore {
    if keywords.is_empty() {
        return AtsScore {
            score: 0,
            matched_keywords: vec![],
            missing_keywords: vec![],
        };
    }

    let resume_keys: HashSet<String> = tokenize(resume_text)
        .into_iter()
        .map(|token| normalize(&token))
        .collect();

    let (matched, missing): (Vec<_>, Vec<_>) = keywords
        .iter()
        .partition(|keyword| resume_keys.contains(&keyword.key));

    let ratio = matched.len() as f64 / keywords.len() as f64;
    let score = (ratio * 100.0).round().clamp(0.0, 100.0) as u8;

    AtsScore {
        score,
        matched_keywords: matched.into_iter().map(|k| k.display.clone()).collect(),
        missing_keywords: missing.into_iter().map(|k| k.display.clone()).collect(),
    }
}
