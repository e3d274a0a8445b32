//! Axum route handlers for cover-letter generation.

use std::time::Duration;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cover_letter::composer::compose_cover_letter;
use crate::cover_letter::extraction::{ExtractedFields, ExtractionStrategy};
use crate::cover_letter::fetcher::{fetch_with_timeout, CompanyProfileFetcher};
use crate::errors::AppError;
use crate::state::AppState;

pub const MISSING_COVER_LETTER_INPUT: &str =
    "Please provide a resume, job description, and company website to generate a cover letter.";

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub resume_text: String,
    pub jd_text: String,
    pub company_url: String,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
    pub fields: ExtractedFields,
    pub extraction_strategy: &'static str,
}

/// Validate → fetch profile (bounded by `timeout`) → extract fields → compose.
///
/// A fetch failure only fails this call; it never touches analysis results.
pub async fn generate_cover_letter(
    fetcher: &dyn CompanyProfileFetcher,
    extractor: &dyn ExtractionStrategy,
    timeout: Duration,
    request: &CoverLetterRequest,
) -> Result<CoverLetterResponse, AppError> {
    if request.resume_text.trim().is_empty()
        || request.jd_text.trim().is_empty()
        || request.company_url.trim().is_empty()
    {
        return Err(AppError::Validation(MISSING_COVER_LETTER_INPUT.to_string()));
    }

    let profile = fetch_with_timeout(fetcher, request.company_url.trim(), timeout).await?;

    let fields = extractor.extract(&request.resume_text, &request.jd_text, &profile);
    let cover_letter = compose_cover_letter(&fields);
    info!(
        "Cover letter composed with {} strategy ({} chars)",
        extractor.name(),
        cover_letter.len()
    );

    Ok(CoverLetterResponse {
        cover_letter,
        fields,
        extraction_strategy: extractor.name(),
    })
}

/// POST /api/v1/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let response = generate_cover_letter(
        state.profile_fetcher.as_ref(),
        state.extractor.as_ref(),
        state.config.fetch_timeout,
        &request,
    )
    .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover_letter::extraction::PlaceholderExtractor;
    use crate::cover_letter::fetcher::{CompanyProfile, FetchError, StaticProfileFetcher};

    fn request(resume: &str, jd: &str, url: &str) -> CoverLetterRequest {
        CoverLetterRequest {
            resume_text: resume.to_string(),
            jd_text: jd.to_string(),
            company_url: url.to_string(),
        }
    }

    fn ok_fetcher() -> StaticProfileFetcher {
        StaticProfileFetcher(Ok(CompanyProfile {
            url: String::new(),
            content_type: None,
            body: "<title>Acme</title>".to_string(),
        }))
    }

    #[tokio::test]
    async fn test_missing_inputs_fail_validation_before_fetch() {
        // A failing fetcher proves the fetch is never reached.
        let fetcher = StaticProfileFetcher(Err(500));
        for req in [
            request("", "jd", "https://acme.com"),
            request("resume", " ", "https://acme.com"),
            request("resume", "jd", ""),
        ] {
            let err = generate_cover_letter(
                &fetcher,
                &PlaceholderExtractor,
                Duration::from_secs(1),
                &req,
            )
            .await
            .unwrap_err();
            match err {
                AppError::Validation(msg) => assert_eq!(msg, MISSING_COVER_LETTER_INPUT),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported_as_fetch_error() {
        let err = generate_cover_letter(
            &StaticProfileFetcher(Err(503)),
            &PlaceholderExtractor,
            Duration::from_secs(1),
            &request("resume", "jd", "https://acme.com"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Fetch(FetchError::Status(503))));
    }

    #[tokio::test]
    async fn test_placeholder_letter_is_composed() {
        let response = generate_cover_letter(
            &ok_fetcher(),
            &PlaceholderExtractor,
            Duration::from_secs(1),
            &request("Jane Doe", "Engineer", "https://acme.com"),
        )
        .await
        .unwrap();
        assert_eq!(response.extraction_strategy, "placeholder");
        assert!(response
            .cover_letter
            .contains("interest in the Position Title position at Company Name."));
        assert!(response.cover_letter.ends_with("Sincerely,\nYour Name"));
        assert_eq!(response.fields.key_skills, vec!["skill1", "skill2", "skill3"]);
    }
}
