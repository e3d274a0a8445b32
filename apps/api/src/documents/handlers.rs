use axum::{
    extract::Multipart,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::documents::export::{export_document, DocumentFormat};
use crate::documents::upload::{detect_format, extract_text};
use crate::errors::AppError;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resume_text: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub text: String,
    pub format: DocumentFormat,
}

/// POST /api/v1/resume/upload
///
/// Reads the multipart `file` field and returns its text. Nothing is saved.
pub async fn handle_upload(mut multipart: Multipart) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let format = detect_format(file_name.as_deref(), field.content_type()).ok_or_else(|| {
            AppError::UnsupportedFormat("Upload a .pdf or plain text resume".to_string())
        })?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;

        let resume_text = tokio::task::spawn_blocking(move || extract_text(&data, format))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

        info!(
            "Extracted {} chars from uploaded {:?} resume",
            resume_text.len(),
            format
        );
        return Ok(Json(UploadResponse {
            resume_text,
            file_name,
        }));
    }

    Err(AppError::Validation(format!(
        "Upload must include a '{FILE_FIELD}' field"
    )))
}

/// POST /api/v1/export
pub async fn handle_export(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    let document = export_document(&request.text, request.format)?;
    let disposition = format!("attachment; filename=\"{}\"", document.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, document.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}
