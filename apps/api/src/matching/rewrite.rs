//! Rewrite engine: rule-based surface edits that produce an "optimized" resume.
//!
//! Two independent strategies:
//! - `Standard`: weak→strong phrase rules plus emphasis on job skills found in
//!   the resume, merged into one annotation pass.
//! - `LeadIn`: literal sentence-opener replacement with "Led ".
//!
//! They never compose; each one reads the original resume text.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::matching::annotate::{
    find_whole_word, highlight_spans, AnnotatedText, AnnotationSpan, LABEL_EMPHASIS, LABEL_REWRITE,
};
use crate::matching::skill_gap::SkillVocabulary;

/// A case-insensitive, whole-phrase substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// Built-in weak→strong table, applied in this order.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("worked on", "developed"),
    ("responsible for", "managed"),
    ("helped", "assisted"),
    ("did", "executed"),
];

/// Sentence openers replaced by the lead-in strategy. Case-sensitive.
pub const LEAD_IN_PHRASES: &[&str] = &["Worked as a ", "Responsible for ", "Helped with "];
pub const LEAD_IN_REPLACEMENT: &str = "Led ";

pub fn default_rules() -> Vec<RewriteRule> {
    DEFAULT_RULES
        .iter()
        .map(|(pattern, replacement)| RewriteRule::new(pattern, replacement))
        .collect()
}

/// Loads a JSON array of `{pattern, replacement}` objects.
pub fn load_rules(path: &Path) -> Result<Vec<RewriteRule>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rewrite rules {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Rewrite rules {} are not a JSON rule array", path.display()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteMode {
    #[default]
    Standard,
    LeadIn,
}

/// Runs the selected strategy against the original resume text.
pub fn rewrite(
    mode: RewriteMode,
    resume_text: &str,
    job_text: &str,
    rules: &[RewriteRule],
    vocabulary: &SkillVocabulary,
) -> AnnotatedText {
    match mode {
        RewriteMode::Standard => optimize_resume(resume_text, job_text, rules, vocabulary),
        RewriteMode::LeadIn => lead_in_rewrite(resume_text),
    }
}

/// Standard optimization.
///
/// 1. Rule spans: every whole-phrase match of each rule, in table order.
/// 2. Emphasis spans: vocabulary skills the job mentions, found in the resume.
/// 3. One merge (rewrites outrank emphasis), one render.
pub fn optimize_resume(
    resume_text: &str,
    job_text: &str,
    rules: &[RewriteRule],
    vocabulary: &SkillVocabulary,
) -> AnnotatedText {
    let mut spans = rule_spans(resume_text, rules);

    let job_skills = vocabulary.mentioned_in(job_text);
    spans.extend(highlight_spans(resume_text, &job_skills, LABEL_EMPHASIS));

    AnnotatedText::new(resume_text, spans)
}

fn rule_spans(text: &str, rules: &[RewriteRule]) -> Vec<AnnotationSpan> {
    rules
        .iter()
        .flat_map(|rule| {
            find_whole_word(text, &rule.pattern)
                .into_iter()
                .map(move |(start, end)| {
                    AnnotationSpan::rewrite(start, end, LABEL_REWRITE, &rule.replacement)
                })
        })
        .collect()
}

/// Aggressive mode: each literal opener phrase becomes "Led ".
pub fn lead_in_rewrite(resume_text: &str) -> AnnotatedText {
    let spans = LEAD_IN_PHRASES
        .iter()
        .flat_map(|phrase| {
            resume_text.match_indices(*phrase).map(|(start, matched)| {
                AnnotationSpan::rewrite(
                    start,
                    start + matched.len(),
                    LABEL_REWRITE,
                    LEAD_IN_REPLACEMENT,
                )
            })
        })
        .collect();

    AnnotatedText::new(resume_text, spans)
}
