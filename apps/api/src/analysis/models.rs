use serde::{Deserialize, Serialize};

pub const EXTRACTION_ERROR_PREFIX: &str = "[Extraction error]";
pub const NO_TEXT_MARKER: &str = "[No text extracted from PDF]";
pub const API_ERROR_PREFIX: &str = "[API error]";

/// Three-panel analysis of one resume upload.
///
/// Every field is best-effort: a failed step leaves an inline marker string
/// (see the constants above) instead of failing the whole result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub resume_text: String,
    pub summary: String,
    pub gaps: String,
    pub roadmap: String,
}

impl AnalysisResult {
    /// Result for an upload whose text could not be read at all.
    pub fn extraction_failed(reason: impl std::fmt::Display) -> Self {
        Self {
            summary: format!("{EXTRACTION_ERROR_PREFIX} {reason}"),
            ..Default::default()
        }
    }

    /// Result for a readable PDF that contained no text.
    pub fn no_text() -> Self {
        Self {
            summary: NO_TEXT_MARKER.to_string(),
            ..Default::default()
        }
    }
}
