//! Job-search keyword derivation.
//!
//! Keywords come either from the LLM (derived from the resume summary) or from
//! a manual edit; both paths go through `normalize_keywords` so the search
//! title always has the same canonical `", "`-joined form.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{KEYWORDS_MAX_TOKENS, KEYWORDS_PROMPT_TEMPLATE};
use crate::llm_client::CompletionClient;

pub mod handlers;

/// Ordered keyword list (most relevant first) plus its display string.
/// Duplicates are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub parts: Vec<String>,
    pub search_title: String,
}

/// Splits free text into keywords: on commas if present, else on newlines,
/// else on whitespace. Fragments are trimmed and empty ones dropped.
pub fn normalize_keywords(raw: &str) -> KeywordSet {
    let text = raw.trim().replace('\r', "");
    if text.is_empty() {
        return KeywordSet::default();
    }

    let parts: Vec<String> = if text.contains(',') {
        collect_parts(text.split(','))
    } else if text.contains('\n') {
        collect_parts(text.split('\n'))
    } else {
        collect_parts(text.split_whitespace())
    };

    KeywordSet {
        search_title: parts.join(", "),
        parts,
    }
}

fn collect_parts<'a>(fragments: impl Iterator<Item = &'a str>) -> Vec<String> {
    fragments
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Asks the LLM for a comma-separated job title / keyword list.
///
/// Uses `summary`, falling back to `resume_text` when the summary is blank.
/// Unlike resume analysis, a failed call is returned to the caller.
pub async fn derive_keywords(
    llm: &dyn CompletionClient,
    summary: &str,
    resume_text: &str,
) -> Result<KeywordSet, AppError> {
    let source = if summary.trim().is_empty() {
        resume_text
    } else {
        summary
    };
    if source.trim().is_empty() {
        return Err(AppError::EmptyInput(
            "A resume summary or resume text is required to extract keywords".to_string(),
        ));
    }

    let prompt = KEYWORDS_PROMPT_TEMPLATE.replace("{summary}", source);
    let raw = llm
        .complete(&prompt, KEYWORDS_MAX_TOKENS)
        .await
        .map_err(|e| AppError::RemoteService(format!("Keyword extraction failed: {e}")))?;

    let keywords = normalize_keywords(&raw);
    info!("Derived {} search keywords", keywords.parts.len());
    Ok(keywords)
}
