//! Candidate keyword extraction from a job description.

use std::collections::HashSet;

use super::tokenize::{normalize, tokenize};

/// Common English function words.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "been", "being", "both", "but", "by", "can", "could", "did", "do", "does", "each",
    "etc", "for", "from", "had", "has", "have", "he", "her", "here", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "just", "may", "me", "more", "most", "my", "no", "not",
    "of", "on", "or", "other", "our", "out", "over", "own", "she", "should", "so", "some",
    "such", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "up", "us", "very", "was", "we", "well", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "within",
    "would", "you", "your",
];

/// Boilerplate that shows up in nearly every job posting and says nothing about
/// the skills being asked for. Entries are singular match keys.
const JOB_POSTING_FILLER: &[&str] = &[
    "ability", "able", "bonus", "candidate", "company", "developer", "engineer", "excellent",
    "experience", "experienced", "familiar", "familiarity", "good", "great", "hire", "hiring",
    "ideal", "including", "join", "knowledge", "looking", "must", "need", "nice", "opportunity",
    "plus", "position", "preferred", "qualification", "required", "requirement",
    "responsibility", "role", "seeking", "skill", "strong", "team", "understanding", "use",
    "using", "want", "work", "working", "year",
];

/// Whether a token carries no matching signal.
/// Checks both the raw token and its match key so `requirements` and
/// `requirement` are treated alike.
pub fn is_stop_word(token: &str, key: &str) -> bool {
    let listed = |word: &str| ENGLISH_STOP_WORDS.contains(&word) || JOB_POSTING_FILLER.contains(&word);
    listed(token) || listed(key)
}

/// A candidate keyword: how it first appeared, and the key it is matched by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    /// Lower-cased surface form of the first occurrence.
    pub display: String,
    /// Plural-collapsed form used for matching.
    pub key: String,
}

/// Deduplicated candidate keywords in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    #[cfg(test)]
    pub fn contains_display(&self, display: &str) -> bool {
        self.keywords.iter().any(|k| k.display == display)
    }
}

/// Extracts candidate keywords from a job description.
///
/// Tokens are normalized, stop words and posting filler are dropped, and
/// plural variants collapse onto the first form seen.
pub fn extract_keywords(job_description: &str) -> KeywordSet {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for token in tokenize(job_description) {
        let key = normalize(&token);
        if is_stop_word(&token, &key) {
            continue;
        }
        if seen.insert(key.clone()) {
            keywords.push(Keyword {
                display: token,
                key,
            });
        }
    }

    KeywordSet { keywords }
}
