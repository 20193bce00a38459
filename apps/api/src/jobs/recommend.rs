//! Job recommendations — queries both providers and normalizes their records.
//!
//! Providers run one after the other (LinkedIn, then Naukri). Each provider's
//! outcome is reported separately so a failure in one never hides results
//! from the other.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::jobs::cards::JobCard;
use crate::jobs::providers::{JobProvider, JobQuery};

pub const DEFAULT_ROWS: u32 = 60;
pub const MIN_ROWS: u32 = 10;
pub const MAX_ROWS: u32 = 200;
pub const DEFAULT_LOCATION: &str = "Remote";

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub search_title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub rows: Option<u32>,
    /// Attach each provider's raw record to its card (debugging aid).
    #[serde(default)]
    pub include_raw: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderResults {
    pub provider: String,
    pub jobs: Vec<JobCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub search_title: String,
    pub location: String,
    pub linkedin: ProviderResults,
    pub naukri: ProviderResults,
}

impl RecommendationRequest {
    fn to_query(&self) -> Result<JobQuery, AppError> {
        let search_title = self.search_title.trim();
        if search_title.is_empty() {
            return Err(AppError::Validation(
                "Please provide job title/keywords via auto-extract or manual input.".to_string(),
            ));
        }
        let location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCATION);

        Ok(JobQuery {
            search_title: search_title.to_string(),
            location: Some(location.to_string()),
            rows: self.rows.unwrap_or(DEFAULT_ROWS).clamp(MIN_ROWS, MAX_ROWS),
        })
    }
}

pub async fn fetch_recommendations(
    linkedin: &dyn JobProvider,
    naukri: &dyn JobProvider,
    request: &RecommendationRequest,
) -> Result<RecommendationResponse, AppError> {
    let query = request.to_query()?;
    info!(
        "Fetching recommendations: search_title={:?}, location={:?}, rows={}",
        query.search_title, query.location, query.rows
    );

    let linkedin_results =
        collect(linkedin, &query, request.include_raw, JobCard::from_linkedin).await;
    let naukri_results = collect(naukri, &query, request.include_raw, JobCard::from_naukri).await;

    Ok(RecommendationResponse {
        search_title: query.search_title,
        location: query.location.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        linkedin: linkedin_results,
        naukri: naukri_results,
    })
}

async fn collect(
    provider: &dyn JobProvider,
    query: &JobQuery,
    include_raw: bool,
    to_card: fn(&Value) -> JobCard,
) -> ProviderResults {
    let name = provider.name();
    match provider.fetch(query).await {
        Ok(records) => {
            info!("{name} returned {} jobs", records.len());
            let jobs = records
                .into_iter()
                .map(|record| {
                    let card = to_card(&record);
                    if include_raw {
                        card.with_raw(record)
                    } else {
                        card
                    }
                })
                .collect();
            ProviderResults {
                provider: name.to_string(),
                jobs,
                error: None,
            }
        }
        Err(e) => {
            warn!("{name} fetch failed: {e}");
            ProviderResults {
                provider: name.to_string(),
                jobs: Vec::new(),
                error: Some(format!("{name} fetch error: {e}")),
            }
        }
    }
}
