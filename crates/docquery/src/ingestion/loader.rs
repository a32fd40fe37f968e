//! Page-level text extraction from stored documents

use async_trait::async_trait;
use std::path::Path;

use crate::error::{Error, Result};

/// Trait for extracting page-level text from a stored file
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Extract text, one string per page, in document order
    async fn load_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// PDF text extractor backed by lopdf
pub struct PdfLoader;

#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn load_pages(&self, path: &Path) -> Result<Vec<String>> {
        let path = path.to_path_buf();

        // lopdf parsing is CPU-bound; keep it off the async executor
        tokio::task::spawn_blocking(move || extract_pdf_pages(&path))
            .await
            .map_err(|e| Error::internal(format!("PDF extraction task failed: {}", e)))?
    }
}

/// Extract text from each page of a PDF, skipping pages with no readable text
pub fn extract_pdf_pages(path: &Path) -> Result<Vec<String>> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let document = lopdf::Document::load(path)
        .map_err(|e| Error::file_parse(&filename, e.to_string()))?;

    let mut pages = Vec::new();
    for (page_no, _) in document.get_pages() {
        match document.extract_text(&[page_no]) {
            Ok(text) => {
                let text = text.trim().to_string();
                if !text.is_empty() {
                    pages.push(text);
                }
            }
            Err(e) => {
                tracing::warn!("Skipping page {} of '{}': {}", page_no, filename, e);
            }
        }
    }

    if pages.is_empty() {
        return Err(Error::file_parse(&filename, "no readable text found"));
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_parse_error() {
        let err = extract_pdf_pages(Path::new("does/not/exist.pdf")).unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let err = extract_pdf_pages(&path).unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }
}
