use std::sync::Arc;

use crate::config::Config;
use crate::cover_letter::extraction::ExtractionStrategy;
use crate::cover_letter::fetcher::CompanyProfileFetcher;
use crate::matching::MatchEngine;
use crate::storage::KeyValueStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Vocabulary + rewrite rules. Read-only after startup.
    pub engine: Arc<MatchEngine>,
    /// Pluggable company profile source. Default: HttpProfileFetcher.
    pub profile_fetcher: Arc<dyn CompanyProfileFetcher>,
    /// Pluggable field extraction. Swap via EXTRACTION_STRATEGY.
    pub extractor: Arc<dyn ExtractionStrategy>,
    /// Saved resume persistence (Redis or in-memory).
    pub store: Arc<dyn KeyValueStore>,
}

#[cfg(test)]
impl AppState {
    /// Default engine, in-memory store, placeholder extraction and a fetcher
    /// that serves `profile` for every URL.
    pub fn for_tests(
        profile: Result<crate::cover_letter::fetcher::CompanyProfile, u16>,
    ) -> Self {
        use crate::cover_letter::extraction::PlaceholderExtractor;
        use crate::cover_letter::fetcher::StaticProfileFetcher;
        use crate::storage::MemoryStore;

        Self {
            config: Config::default(),
            engine: Arc::new(MatchEngine::default()),
            profile_fetcher: Arc::new(StaticProfileFetcher(profile)),
            extractor: Arc::new(PlaceholderExtractor),
            store: Arc::new(MemoryStore::default()),
        }
    }
}
