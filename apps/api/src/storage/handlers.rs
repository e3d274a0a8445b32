use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::RESUME_KEY;

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedResume {
    pub resume_text: String,
}

/// GET /api/v1/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
) -> Result<Json<SavedResume>, AppError> {
    let resume_text = state
        .store
        .get(RESUME_KEY)
        .await?
        .ok_or_else(|| AppError::NotFound("No saved resume".to_string()))?;
    Ok(Json(SavedResume { resume_text }))
}

/// PUT /api/v1/resume
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Json(request): Json<SavedResume>,
) -> Result<StatusCode, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }
    state.store.set(RESUME_KEY, &request.resume_text).await?;
    tracing::debug!("Saved resume ({} chars)", request.resume_text.len());
    Ok(StatusCode::NO_CONTENT)
}
