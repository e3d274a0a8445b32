#![allow(dead_code)]

//! Skill gap analysis over a closed, controlled vocabulary.
//!
//! Unlike keyword matching, skills are detected by case-insensitive substring
//! containment in the raw text, so multi-word entries ("machine learning")
//! and punctuated ones ("node.js") work without tokenization.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Built-in skill vocabulary. Replace at runtime with `SKILL_VOCABULARY_PATH`.
pub const DEFAULT_SKILLS: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "java",
    "c++",
    "rust",
    "react",
    "angular",
    "vue",
    "node.js",
    "express",
    "django",
    "flask",
    "sql",
    "postgresql",
    "mongodb",
    "graphql",
    "html",
    "css",
    "aws",
    "azure",
    "docker",
    "kubernetes",
    "terraform",
    "git",
    "linux",
    "agile",
    "scrum",
    "machine learning",
    "data analysis",
    "project management",
    "leadership",
    "communication",
];

/// Ordered, lower-cased controlled vocabulary. Deserializes from a plain
/// string array through [`SkillVocabulary::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillVocabulary {
    skills: Vec<String>,
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied())
    }
}

impl From<Vec<String>> for SkillVocabulary {
    fn from(skills: Vec<String>) -> Self {
        Self::new(skills)
    }
}

impl From<SkillVocabulary> for Vec<String> {
    fn from(vocabulary: SkillVocabulary) -> Self {
        vocabulary.skills
    }
}

impl SkillVocabulary {
    /// Builds a vocabulary, normalizing to lower case and dropping blanks and
    /// duplicates while keeping declaration order.
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let skills = skills
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { skills }
    }

    /// Loads a JSON array of strings from disk.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skill vocabulary {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Skill vocabulary {} is not a JSON string array", path.display()))
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Vocabulary entries contained in `text`, in vocabulary order.
    pub fn mentioned_in(&self, text: &str) -> Vec<String> {
        let text_lower = text.to_lowercase();
        self.skills
            .iter()
            .filter(|skill| text_lower.contains(skill.as_str()))
            .cloned()
            .collect()
    }
}

/// Vocabulary skills the job asks for, split by whether the resume has them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGapResult {
    pub present_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl SkillGapResult {
    /// Every skill the job text mentions, in vocabulary order.
    pub fn job_skills(&self, vocabulary: &SkillVocabulary) -> Vec<String> {
        vocabulary
            .skills()
            .iter()
            .filter(|s| self.present_skills.contains(s) || self.missing_skills.contains(s))
            .cloned()
            .collect()
    }
}

pub fn compute_skill_gap(
    job_text: &str,
    resume_text: &str,
    vocabulary: &SkillVocabulary,
) -> SkillGapResult {
    let job_skills = vocabulary.mentioned_in(job_text);
    let resume_skills: HashSet<String> = vocabulary.mentioned_in(resume_text).into_iter().collect();

    let (present_skills, missing_skills) = job_skills
        .into_iter()
        .partition(|skill| resume_skills.contains(skill));

    SkillGapResult {
        present_skills,
        missing_skills,
    }
}
