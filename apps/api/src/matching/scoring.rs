//! Keyword match scoring: measures how much of a job description's keyword
//! inventory shows up in a resume.
//!
//! Membership is a substring test against the lower-cased resume text, not a
//! token-set intersection: "java" counts as present in a resume that only
//! mentions "javascript". That looseness is the contract, keep it.

use serde::Serialize;

use crate::matching::tokenizer::{tokenize, KeywordSet};

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Result of matching one job description against one resume.
///
/// `matched_keywords` and `missing_keywords` partition the job's keyword set
/// and both follow its first-occurrence order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub matched_count: usize,
    pub total_count: usize,
    /// 0.0 – 100.0, two decimals. 0.0 when the job text has no keywords.
    pub score_percent: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

impl MatchResult {
    /// Score formatted with exactly two decimals, e.g. `"20.00"`.
    pub fn score_label(&self) -> String {
        format!("{:.2}", self.score_percent)
    }

    fn empty() -> Self {
        Self {
            matched_count: 0,
            total_count: 0,
            score_percent: 0.0,
            matched_keywords: vec![],
            missing_keywords: vec![],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Tokenizes `job_text` and checks each keyword against `resume_text`.
pub fn compute_match(job_text: &str, resume_text: &str) -> MatchResult {
    match_keywords(&tokenize(job_text), resume_text)
}

/// Same as [`compute_match`] for a job keyword set that is already computed.
pub fn match_keywords(job_keywords: &KeywordSet, resume_text: &str) -> MatchResult {
    if job_keywords.is_empty() {
        return MatchResult::empty();
    }

    let resume_lower = resume_text.to_lowercase();

    let (matched_keywords, missing_keywords): (Vec<String>, Vec<String>) = job_keywords
        .iter()
        .map(str::to_string)
        .partition(|kw| resume_lower.contains(kw.as_str()));

    let matched_count = matched_keywords.len();
    let total_count = job_keywords.len();

    MatchResult {
        matched_count,
        total_count,
        score_percent: percent(matched_count, total_count),
        matched_keywords,
        missing_keywords,
    }
}

/// `part / whole * 100` rounded to two decimals; 0.0 for an empty whole.
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    ((raw * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
