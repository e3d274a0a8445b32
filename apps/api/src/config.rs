use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::cover_letter::extraction::ExtractionKind;

/// Application configuration loaded from environment variables.
/// Fails at startup if a set variable holds an invalid value.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Redis for saved resumes; `None` keeps them in process memory.
    pub redis_url: Option<String>,
    pub fetch_timeout: Duration,
    pub skill_vocabulary_path: Option<PathBuf>,
    pub rewrite_rules_path: Option<PathBuf>,
    pub extraction_strategy: ExtractionKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            redis_url: None,
            fetch_timeout: Duration::from_secs(10),
            skill_vocabulary_path: None,
            rewrite_rules_path: None,
            extraction_strategy: ExtractionKind::Placeholder,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let port = match get("PORT") {
            Some(v) => v
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };

        let fetch_timeout = match get("FETCH_TIMEOUT_SECS") {
            Some(v) => {
                let secs = v
                    .parse::<u64>()
                    .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?;
                if secs == 0 {
                    bail!("FETCH_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => defaults.fetch_timeout,
        };

        let extraction_strategy = match get("EXTRACTION_STRATEGY") {
            Some(v) => v
                .parse::<ExtractionKind>()
                .context("EXTRACTION_STRATEGY must be 'placeholder' or 'heuristic'")?,
            None => defaults.extraction_strategy,
        };

        Ok(Config {
            port,
            rust_log: get("RUST_LOG").unwrap_or(defaults.rust_log),
            redis_url: get("REDIS_URL"),
            fetch_timeout,
            skill_vocabulary_path: get("SKILL_VOCABULARY_PATH").map(PathBuf::from),
            rewrite_rules_path: get("REWRITE_RULES_PATH").map(PathBuf::from),
            extraction_strategy,
        })
    }
}
