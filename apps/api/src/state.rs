use std::sync::Arc;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::config::Config;
use crate::jobs::providers::JobProvider;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<dyn CompletionClient>,
    /// Owns the process-lifetime analysis cache.
    pub analyzer: Arc<ResumeAnalyzer>,
    pub linkedin: Arc<dyn JobProvider>,
    pub naukri: Arc<dyn JobProvider>,
}
