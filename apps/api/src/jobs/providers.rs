//! Job providers — LinkedIn-like and Naukri-like listing sources.
//!
//! Both run a scraping actor on Apify and return the raw dataset records.
//! They differ only in actor id and input shape, so each provider is a small
//! adapter over the shared `ApifyClient`.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::jobs::apify::ApifyClient;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("APIFY_API_KEY not configured")]
    MissingCredentials,

    #[error("Search query is empty for {0} actor")]
    EmptyQuery(&'static str),

    #[error("{0}")]
    Invocation(String),

    #[error("Run {run_id} finished with status {status}")]
    RunFailed { run_id: String, status: String },

    #[error("{0}")]
    Dataset(String),
}

/// One search against a provider.
#[derive(Debug, Clone)]
pub struct JobQuery {
    pub search_title: String,
    pub location: Option<String>,
    pub rows: u32,
}

#[async_trait]
pub trait JobProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, query: &JobQuery) -> Result<Vec<Value>, ProviderError>;
}

pub struct LinkedInProvider {
    apify: ApifyClient,
    actor_id: String,
}

impl LinkedInProvider {
    pub fn new(apify: ApifyClient, actor_id: String) -> Self {
        Self { apify, actor_id }
    }
}

#[async_trait]
impl JobProvider for LinkedInProvider {
    fn name(&self) -> &'static str {
        "LinkedIn"
    }

    async fn fetch(&self, query: &JobQuery) -> Result<Vec<Value>, ProviderError> {
        let input = linkedin_run_input(query)?;
        run_and_collect(&self.apify, &self.actor_id, self.name(), &input).await
    }
}

pub struct NaukriProvider {
    apify: ApifyClient,
    actor_id: String,
}

impl NaukriProvider {
    pub fn new(apify: ApifyClient, actor_id: String) -> Self {
        Self { apify, actor_id }
    }
}

#[async_trait]
impl JobProvider for NaukriProvider {
    fn name(&self) -> &'static str {
        "Naukri"
    }

    async fn fetch(&self, query: &JobQuery) -> Result<Vec<Value>, ProviderError> {
        let input = naukri_run_input(query)?;
        run_and_collect(&self.apify, &self.actor_id, self.name(), &input).await
    }
}

async fn run_and_collect(
    apify: &ApifyClient,
    actor_id: &str,
    provider: &str,
    input: &Value,
) -> Result<Vec<Value>, ProviderError> {
    let run = apify.call_actor(actor_id, input).await.map_err(|e| match e {
        ProviderError::Invocation(msg) => {
            ProviderError::Invocation(format!("{provider} actor call failed: {msg}"))
        }
        other => other,
    })?;

    // A run without a dataset simply produced nothing.
    let Some(dataset_id) = run.default_dataset_id.filter(|id| !id.is_empty()) else {
        info!("{provider} run {} has no dataset", run.id);
        return Ok(Vec::new());
    };

    apify.dataset_items(&dataset_id).await
}

/// Trims the search title; a blank title is rejected before any remote call.
pub fn normalize_search_query(raw: &str, provider: &'static str) -> Result<String, ProviderError> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(ProviderError::EmptyQuery(provider));
    }
    Ok(query.to_string())
}

pub fn linkedin_run_input(query: &JobQuery) -> Result<Value, ProviderError> {
    let title = normalize_search_query(&query.search_title, "LinkedIn")?;
    let location = query
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or("Remote");

    Ok(json!({
        "title": title,
        "location": location,
        "rows": query.rows,
        "proxy": {
            "useApifyProxy": true,
            "ApifyProxyGroups": ["SHADER"]
        }
    }))
}

/// The Naukri actor has no location filter; `query.location` is ignored.
pub fn naukri_run_input(query: &JobQuery) -> Result<Value, ProviderError> {
    let keyword = normalize_search_query(&query.search_title, "Naukri")?;

    Ok(json!({
        "keyword": keyword,
        "maxJobs": query.rows,
        "freshness": "all",
        "sortBy": "relevance",
        "experience": "all",
        "jobType": "all"
    }))
}
