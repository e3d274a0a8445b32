//! Axum route handlers for the matching engine.
//!
//! Handlers validate, call the pure engine, and serialize. No state is kept
//! between requests.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::matching::annotate::{AnnotatedText, LABEL_KEYWORD};
use crate::matching::rewrite::RewriteMode;
use crate::matching::scoring::MatchResult;
use crate::matching::session::{require_documents, AnalysisSession};
use crate::matching::skill_gap::SkillGapResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DocumentPairRequest {
    pub resume_text: String,
    pub jd_text: String,
    #[serde(default)]
    pub mode: RewriteMode,
}

#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    pub text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_label")]
    pub label: String,
}

fn default_label() -> String {
    LABEL_KEYWORD.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<DocumentPairRequest>,
) -> Result<Json<MatchResult>, AppError> {
    require_documents(&request.resume_text, &request.jd_text)?;
    Ok(Json(
        state.engine.compute_match(&request.jd_text, &request.resume_text),
    ))
}

/// POST /api/v1/analysis/skill-gap
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    Json(request): Json<DocumentPairRequest>,
) -> Result<Json<SkillGapResult>, AppError> {
    require_documents(&request.resume_text, &request.jd_text)?;
    Ok(Json(
        state
            .engine
            .compute_skill_gap(&request.jd_text, &request.resume_text),
    ))
}

/// POST /api/v1/analysis/annotate
///
/// Total: any text and keyword list is accepted, including empty ones.
pub async fn handle_annotate(
    State(state): State<AppState>,
    Json(request): Json<AnnotateRequest>,
) -> Json<AnnotatedText> {
    Json(
        state
            .engine
            .annotate(&request.text, &request.keywords, &request.label),
    )
}

/// POST /api/v1/analysis/optimize
///
/// `mode` picks the standard rule pipeline or the lead-in rewrite; the two
/// are never combined.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<DocumentPairRequest>,
) -> Result<Json<AnnotatedText>, AppError> {
    require_documents(&request.resume_text, &request.jd_text)?;
    Ok(Json(state.engine.optimize(
        request.mode,
        &request.resume_text,
        &request.jd_text,
    )))
}

/// POST /api/v1/analysis
///
/// Full analysis in one call, returned as an `AnalysisSession`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<DocumentPairRequest>,
) -> Result<Json<AnalysisSession>, AppError> {
    let session = AnalysisSession::analyze(
        &state.engine,
        &request.resume_text,
        &request.jd_text,
        request.mode,
    )?;
    tracing::info!(
        "Analysis {} scored {}",
        session.id,
        session.match_result.score_label()
    );
    Ok(Json(session))
}
