// Prompt templates for every LLM call. Replace `{text}` / `{summary}` before sending.

/// Output budget for each of the three resume analysis prompts.
pub const ANALYSIS_MAX_TOKENS: u32 = 500;
/// Output budget for keyword derivation.
pub const KEYWORDS_MAX_TOKENS: u32 = 60;

pub const SUMMARY_PROMPT_TEMPLATE: &str =
    "Summarize this resume highlighting the skills, education, and experience: {text}";

pub const GAPS_PROMPT_TEMPLATE: &str = "Analyze this resume and highlight missing skills, \
    certifications and experience needed for job opportunities: {text}";

pub const ROADMAP_PROMPT_TEMPLATE: &str = "Based on this resume, suggest a future roadmap to \
    improve career prospects (skills, certifications, industry exposure): {text}";

pub const KEYWORDS_PROMPT_TEMPLATE: &str = "Based on this resume summary, suggest a suitable \
    job title and keywords for job search. Return a comma-separated list only (no explanation).\
    \n\nSummary: {summary}";
