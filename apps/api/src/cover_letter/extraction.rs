//! Extraction strategies: derive the cover letter's fields from raw inputs.
//!
//! The composer only ever sees `ExtractedFields`; which strategy fills them is
//! chosen at startup (`EXTRACTION_STRATEGY`) and carried in `AppState` as
//! `Arc<dyn ExtractionStrategy>`.

use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cover_letter::fetcher::{parse_company_url, CompanyProfile};
use crate::matching::skill_gap::SkillVocabulary;

pub const PLACEHOLDER_NAME: &str = "Your Name";
pub const PLACEHOLDER_SKILLS: &[&str] = &["skill1", "skill2", "skill3"];
pub const PLACEHOLDER_JOB_TITLE: &str = "Position Title";
pub const PLACEHOLDER_COMPANY_NAME: &str = "Company Name";
pub const PLACEHOLDER_MISSION: &str = "company mission statement";
pub const STOCK_PERSONALIZED_PARAGRAPH: &str = "This is a personalized paragraph based on your resume, the job description, and company information.";
pub const STOCK_SKILLS_PARAGRAPH: &str =
    "This paragraph highlights your relevant skills and experience for the position.";

const MAX_KEY_SKILLS: usize = 5;

static TITLE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok());

static META_DESCRIPTION_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta\s[^>]*name\s*=\s*["']description["'][^>]*content\s*=\s*["']([^"']*)["']"#,
    )
    .ok()
});

/// Fields the cover-letter template is filled from. Opaque to the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: String,
    pub key_skills: Vec<String>,
    pub job_title: String,
    pub company_name: String,
    pub company_mission: String,
    pub personalized_paragraph: String,
    pub skills_experience_paragraph: String,
}

pub trait ExtractionStrategy: Send + Sync {
    /// Short identifier reported back to API callers.
    fn name(&self) -> &'static str;

    fn extract(&self, resume_text: &str, job_text: &str, profile: &CompanyProfile)
        -> ExtractedFields;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionKind {
    Placeholder,
    Heuristic,
}

#[derive(Debug, Error)]
#[error("unknown extraction strategy '{0}'")]
pub struct UnknownExtractionKind(String);

impl FromStr for ExtractionKind {
    type Err = UnknownExtractionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(ExtractionKind::Placeholder),
            "heuristic" => Ok(ExtractionKind::Heuristic),
            other => Err(UnknownExtractionKind(other.to_string())),
        }
    }
}

pub fn build_extractor(
    kind: ExtractionKind,
    vocabulary: &SkillVocabulary,
) -> Arc<dyn ExtractionStrategy> {
    match kind {
        ExtractionKind::Placeholder => Arc::new(PlaceholderExtractor),
        ExtractionKind::Heuristic => Arc::new(HeuristicExtractor::new(vocabulary.clone())),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PlaceholderExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Fixed placeholder values, ready for the user to edit by hand.
pub struct PlaceholderExtractor;

impl ExtractionStrategy for PlaceholderExtractor {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn extract(&self, _resume: &str, _job: &str, _profile: &CompanyProfile) -> ExtractedFields {
        ExtractedFields {
            name: PLACEHOLDER_NAME.to_string(),
            key_skills: placeholder_skills(),
            job_title: PLACEHOLDER_JOB_TITLE.to_string(),
            company_name: PLACEHOLDER_COMPANY_NAME.to_string(),
            company_mission: PLACEHOLDER_MISSION.to_string(),
            personalized_paragraph: STOCK_PERSONALIZED_PARAGRAPH.to_string(),
            skills_experience_paragraph: STOCK_SKILLS_PARAGRAPH.to_string(),
        }
    }
}

fn placeholder_skills() -> Vec<String> {
    PLACEHOLDER_SKILLS.iter().map(|s| s.to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Line- and markup-based guesses, falling back to placeholders field by field.
///
/// - name: first non-empty resume line
/// - key skills: vocabulary skills in the resume (max 5)
/// - job title: first non-empty job description line
/// - company name: `<title>` of the profile page, else the URL host
/// - mission: `<meta name="description">` content
pub struct HeuristicExtractor {
    vocabulary: SkillVocabulary,
}

impl HeuristicExtractor {
    pub fn new(vocabulary: SkillVocabulary) -> Self {
        Self { vocabulary }
    }
}

impl ExtractionStrategy for HeuristicExtractor {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn extract(&self, resume_text: &str, job_text: &str, profile: &CompanyProfile) -> ExtractedFields {
        let name = first_line(resume_text).unwrap_or(PLACEHOLDER_NAME).to_string();
        let job_title = first_line(job_text).unwrap_or(PLACEHOLDER_JOB_TITLE).to_string();

        let resume_skills = self.vocabulary.mentioned_in(resume_text);
        let job_skills = self.vocabulary.mentioned_in(job_text);
        let shared: Vec<String> = resume_skills
            .iter()
            .filter(|s| job_skills.contains(s))
            .cloned()
            .collect();

        let key_skills = if resume_skills.is_empty() {
            placeholder_skills()
        } else {
            resume_skills.into_iter().take(MAX_KEY_SKILLS).collect()
        };

        let company_name = page_title(&profile.body)
            .or_else(|| host_name(&profile.url))
            .unwrap_or_else(|| PLACEHOLDER_COMPANY_NAME.to_string());
        let company_mission =
            meta_description(&profile.body).unwrap_or_else(|| PLACEHOLDER_MISSION.to_string());

        let personalized_paragraph = if shared.is_empty() {
            STOCK_PERSONALIZED_PARAGRAPH.to_string()
        } else {
            format!(
                "The {job_title} role calls for {}, which is exactly where my recent work has been focused.",
                shared.join(", ")
            )
        };

        ExtractedFields {
            name,
            key_skills,
            job_title,
            company_name,
            company_mission,
            personalized_paragraph,
            skills_experience_paragraph: STOCK_SKILLS_PARAGRAPH.to_string(),
        }
    }
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

/// `<title>` text, cut at the first " | " or " - " separator.
fn page_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.as_ref()?.captures(html)?.get(1)?.as_str();
    let title = raw
        .split(" | ")
        .next()
        .and_then(|s| s.split(" - ").next())
        .map(str::trim)
        .unwrap_or_default();
    (!title.is_empty()).then(|| title.to_string())
}

fn meta_description(html: &str) -> Option<String> {
    let content = META_DESCRIPTION_RE.as_ref()?.captures(html)?.get(1)?.as_str().trim();
    (!content.is_empty()).then(|| content.to_string())
}

fn host_name(url: &str) -> Option<String> {
    let parsed = parse_company_url(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}
