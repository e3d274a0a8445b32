//! `AnalysisSession`: the immutable result of one full resume/JD analysis.
//!
//! A session is produced by a single call and handed back to the caller;
//! nothing is held server-side between requests.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::annotate::{AnnotatedText, LABEL_KEYWORD};
use crate::matching::engine::MatchEngine;
use crate::matching::rewrite::RewriteMode;
use crate::matching::scoring::{match_keywords, MatchResult};
use crate::matching::skill_gap::SkillGapResult;
use crate::matching::tokenizer::Document;

pub const MISSING_INPUT_MESSAGE: &str = "Please provide both a resume and a job description.";

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub mode: RewriteMode,
    pub match_result: MatchResult,
    pub skill_gap: SkillGapResult,
    /// Resume with matched job keywords marked.
    pub highlighted_resume: AnnotatedText,
    pub optimized_resume: AnnotatedText,
}

/// Rejects blank resume or job text before any computation.
pub fn require_documents(resume_text: &str, job_text: &str) -> Result<(), AppError> {
    if resume_text.trim().is_empty() || job_text.trim().is_empty() {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    }
    Ok(())
}

impl AnalysisSession {
    pub fn analyze(
        engine: &MatchEngine,
        resume_text: &str,
        job_text: &str,
        mode: RewriteMode,
    ) -> Result<Self, AppError> {
        require_documents(resume_text, job_text)?;

        let job = Document::new(job_text);
        let resume = Document::new(resume_text);

        let match_result = match_keywords(job.keywords(), resume.text());
        let skill_gap = engine.compute_skill_gap(job.text(), resume.text());
        let highlighted_resume =
            engine.annotate(resume.text(), &match_result.matched_keywords, LABEL_KEYWORD);
        let optimized_resume = engine.optimize(mode, resume.text(), job.text());

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            mode,
            match_result,
            skill_gap,
            highlighted_resume,
            optimized_resume,
        })
    }
}
