//! Export: encodes resume or cover-letter text as a downloadable document.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Txt => "text/plain; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub format: DocumentFormat,
    pub file_name: String,
    pub bytes: Bytes,
}

pub fn export_document(text: &str, format: DocumentFormat) -> Result<ExportedDocument, AppError> {
    match format {
        DocumentFormat::Txt => Ok(ExportedDocument {
            format,
            file_name: format!("resume.{}", format.extension()),
            bytes: Bytes::copy_from_slice(text.as_bytes()),
        }),
        DocumentFormat::Pdf | DocumentFormat::Docx => Err(AppError::UnsupportedFormat(format!(
            "Export to {} is not available; use txt",
            format.extension()
        ))),
    }
}
