// Document boundary: resume files in, rendered text out.
// PDF/DOCX encoding on export is not done here; only plain text is written.

pub mod export;
pub mod handlers;
pub mod upload;
