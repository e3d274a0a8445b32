//! Resume upload: turns an uploaded file into plain resume text.

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    PlainText,
}

/// Detects the format from the file extension first, then the content type.
pub fn detect_format(file_name: Option<&str>, content_type: Option<&str>) -> Option<SourceFormat> {
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => return Some(SourceFormat::Pdf),
        Some("txt" | "md" | "text") => return Some(SourceFormat::PlainText),
        _ => {}
    }

    let mime = content_type?.split(';').next()?.trim().to_ascii_lowercase();
    if mime == "application/pdf" {
        Some(SourceFormat::Pdf)
    } else if mime.starts_with("text/") {
        Some(SourceFormat::PlainText)
    } else {
        None
    }
}

/// CPU-bound for PDFs; call from `spawn_blocking`.
pub fn extract_text(bytes: &[u8], format: SourceFormat) -> Result<String, AppError> {
    match format {
        SourceFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}"))),
        SourceFormat::PlainText => String::from_utf8(bytes.to_vec()).map_err(|_| {
            AppError::UnprocessableEntity("Text file is not valid UTF-8".to_string())
        }),
    }
}
