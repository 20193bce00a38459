//! Text extraction from uploaded resume PDFs.
//!
//! `pdf-extract` is synchronous and CPU-bound; callers run it inside
//! `tokio::task::spawn_blocking`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read PDF: {0}")]
    Malformed(String),

    #[error("PDF parser crashed on malformed input")]
    ParserPanic,

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Seam for anything that turns raw upload bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// `pdf-extract` backed extractor. Returns concatenated page text, trimmed.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        if bytes.is_empty() {
            return Ok(String::new());
        }

        // pdf-extract panics on some malformed streams instead of returning Err.
        let text = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
            .map_err(|_| ExtractionError::ParserPanic)?
            .map_err(|e| ExtractionError::Malformed(e.to_string()))?;

        Ok(join_pages(&text))
    }
}

/// pdf-extract separates pages with form feeds; pages are joined with newlines.
fn join_pages(raw: &str) -> String {
    raw.split('\x0C')
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bytes_yield_empty_text() {
        let text = PdfTextExtractor.extract(&[]).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        let result = PdfTextExtractor.extract(b"definitely not a pdf");
        assert!(result.is_err());
    }

    #[test]
    fn test_join_pages_replaces_form_feeds_and_trims() {
        assert_eq!(join_pages("  page one\x0Cpage two\n\n"), "page one\npage two");
    }
}
