//! `MatchEngine` bundles the configured skill vocabulary and rewrite rule table.
//!
//! Every method is pure: fresh results per call, no shared mutable state, so
//! one `Arc<MatchEngine>` is shared across all request handlers.

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::matching::annotate::{annotate, AnnotatedText};
use crate::matching::rewrite::{default_rules, load_rules, rewrite, RewriteMode, RewriteRule};
use crate::matching::scoring::{compute_match, MatchResult};
use crate::matching::skill_gap::{compute_skill_gap, SkillGapResult, SkillVocabulary};

#[derive(Debug, Clone)]
pub struct MatchEngine {
    vocabulary: SkillVocabulary,
    rules: Vec<RewriteRule>,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(SkillVocabulary::default(), default_rules())
    }
}

impl MatchEngine {
    pub fn new(vocabulary: SkillVocabulary, rules: Vec<RewriteRule>) -> Self {
        Self { vocabulary, rules }
    }

    /// Built-in tables, overridden by the JSON files named in config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let vocabulary = match &config.skill_vocabulary_path {
            Some(path) => SkillVocabulary::from_json_file(path)?,
            None => SkillVocabulary::default(),
        };
        let rules = match &config.rewrite_rules_path {
            Some(path) => load_rules(path)?,
            None => default_rules(),
        };
        info!(
            "Match engine ready: {} skills, {} rewrite rules",
            vocabulary.len(),
            rules.len()
        );
        Ok(Self::new(vocabulary, rules))
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn compute_match(&self, job_text: &str, resume_text: &str) -> MatchResult {
        let result = compute_match(job_text, resume_text);
        debug!(
            "Keyword match: {}/{} ({})",
            result.matched_count,
            result.total_count,
            result.score_label()
        );
        result
    }

    pub fn compute_skill_gap(&self, job_text: &str, resume_text: &str) -> SkillGapResult {
        let gap = compute_skill_gap(job_text, resume_text, &self.vocabulary);
        debug!(
            "Skill gap: {} present, {} missing",
            gap.present_skills.len(),
            gap.missing_skills.len()
        );
        gap
    }

    pub fn annotate<S: AsRef<str>>(&self, text: &str, keywords: &[S], label: &str) -> AnnotatedText {
        annotate(text, keywords, label)
    }

    pub fn optimize(&self, mode: RewriteMode, resume_text: &str, job_text: &str) -> AnnotatedText {
        let optimized = rewrite(mode, resume_text, job_text, &self.rules, &self.vocabulary);
        debug!("Optimized resume ({mode:?}): {} spans", optimized.spans().len());
        optimized
    }
}
