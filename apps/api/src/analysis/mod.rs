// Resume analysis: text extraction → summary / gaps / roadmap prompts,
// memoized per distinct upload. All LLM calls go through llm_client.

pub mod analyzer;
pub mod cache;
pub mod handlers;
pub mod models;
