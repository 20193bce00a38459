//! Resume Analyzer — orchestrates extraction and the three analysis prompts.
//!
//! Flow: cache lookup → extract text (spawn_blocking) → summary / gaps / roadmap
//! prompts in parallel → memoized `AnalysisResult`.
//!
//! Failures never escape `analyze`: an extraction failure short-circuits into a
//! marker in `summary`, and each prompt failure only marks its own field.

use std::sync::Arc;

use tracing::{info, warn};

use crate::analysis::cache::AnalysisCache;
use crate::analysis::models::{AnalysisResult, API_ERROR_PREFIX};
use crate::extraction::{ExtractionError, TextExtractor};
use crate::llm_client::prompts::{
    ANALYSIS_MAX_TOKENS, GAPS_PROMPT_TEMPLATE, ROADMAP_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE,
};
use crate::llm_client::CompletionClient;

pub struct ResumeAnalyzer {
    extractor: Arc<dyn TextExtractor>,
    llm: Arc<dyn CompletionClient>,
    cache: AnalysisCache,
}

impl ResumeAnalyzer {
    pub fn new(extractor: Arc<dyn TextExtractor>, llm: Arc<dyn CompletionClient>) -> Self {
        Self {
            extractor,
            llm,
            cache: AnalysisCache::new(),
        }
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Analyzes a resume upload. Byte-identical uploads are computed once per
    /// process; later calls return the same `Arc`.
    pub async fn analyze(&self, resume_bytes: &[u8]) -> Arc<AnalysisResult> {
        self.cache
            .get_or_compute(resume_bytes, || self.compute(resume_bytes))
            .await
    }

    async fn compute(&self, resume_bytes: &[u8]) -> AnalysisResult {
        let text = match self.extract(resume_bytes.to_vec()).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Resume text extraction failed: {e}");
                return AnalysisResult::extraction_failed(e);
            }
        };

        if text.is_empty() {
            info!("No text extracted from {} byte upload", resume_bytes.len());
            return AnalysisResult::no_text();
        }
        info!("Extracted {} characters of resume text", text.chars().count());

        // Independent prompts: no shared state, failures isolated per field.
        let (summary, gaps, roadmap) = tokio::join!(
            self.ask("summary", SUMMARY_PROMPT_TEMPLATE, &text),
            self.ask("gaps", GAPS_PROMPT_TEMPLATE, &text),
            self.ask("roadmap", ROADMAP_PROMPT_TEMPLATE, &text),
        );

        AnalysisResult {
            resume_text: text,
            summary,
            gaps,
            roadmap,
        }
    }

    async fn extract(&self, bytes: Vec<u8>) -> Result<String, ExtractionError> {
        let extractor = self.extractor.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
    }

    async fn ask(&self, field: &str, template: &str, text: &str) -> String {
        let prompt = template.replace("{text}", text);
        match self.llm.complete(&prompt, ANALYSIS_MAX_TOKENS).await {
            Ok(answer) => answer.trim().to_string(),
            Err(e) => {
                warn!("Resume {field} prompt failed: {e}");
                format!("{API_ERROR_PREFIX} {e}")
            }
        }
    }
}
