//! Minimal client for the Apify actor API (v2).
//!
//! Covers the three calls the job providers need: start an actor run, wait
//! for it to reach a terminal status, and page through the run's default
//! dataset. Every HTTP request carries the configured timeout, and the
//! server-side `waitForFinish` long-poll is kept below it.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::jobs::providers::ProviderError;

/// Items fetched per dataset page.
const DATASET_PAGE_LIMIT: usize = 1000;
/// Total item count Apify reports on every dataset page.
const PAGINATION_TOTAL_HEADER: &str = "x-apify-pagination-total";
/// Apify caps `waitForFinish` at 60 seconds.
const MAX_WAIT_FOR_FINISH_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRun {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub default_dataset_id: Option<String>,
}

impl ActorRun {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status.as_str(),
            "SUCCEEDED" | "FAILED" | "ABORTED" | "TIMED-OUT"
        )
    }

    pub fn succeeded(&self) -> bool {
        self.status == "SUCCEEDED"
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Clone)]
pub struct ApifyClient {
    client: Client,
    base_url: String,
    token: String,
    /// Long-poll duration requested per call, always below the HTTP timeout.
    wait_for_finish_secs: u64,
    run_timeout: Duration,
}

impl ApifyClient {
    pub fn new(
        token: String,
        base_url: String,
        request_timeout: Duration,
        run_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if token.trim().is_empty() {
            return Err(ProviderError::MissingCredentials);
        }
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ProviderError::Invocation(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            wait_for_finish_secs: wait_for_finish_secs(request_timeout),
            run_timeout,
        })
    }

    /// Starts `actor_id` with `input` and blocks until the run finishes.
    pub async fn call_actor(&self, actor_id: &str, input: &Value) -> Result<ActorRun, ProviderError> {
        let url = format!("{}/acts/{}/runs", self.base_url, actor_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .query(&[("waitForFinish", self.wait_for_finish_secs)])
            .json(input)
            .send()
            .await
            .map_err(|e| ProviderError::Invocation(format!("Failed to call actor {actor_id}: {e}")))?;

        let mut run = read_run(response)
            .await
            .map_err(|e| ProviderError::Invocation(format!("Actor {actor_id} call failed: {e}")))?;
        info!("Started actor {actor_id}: run {} ({})", run.id, run.status);

        let started = Instant::now();
        while !run.is_terminal() {
            if started.elapsed() >= self.run_timeout {
                return Err(ProviderError::Invocation(format!(
                    "Run {} of actor {actor_id} did not finish within {}s",
                    run.id,
                    self.run_timeout.as_secs()
                )));
            }
            run = self.wait_for_run(&run.id).await?;
            debug!("Run {} status: {}", run.id, run.status);
        }

        if !run.succeeded() {
            return Err(ProviderError::RunFailed {
                run_id: run.id,
                status: run.status,
            });
        }
        info!(
            "Run {} succeeded (dataset: {})",
            run.id,
            run.default_dataset_id.as_deref().unwrap_or("none")
        );
        Ok(run)
    }

    async fn wait_for_run(&self, run_id: &str) -> Result<ActorRun, ProviderError> {
        let url = format!("{}/actor-runs/{}", self.base_url, run_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("waitForFinish", self.wait_for_finish_secs)])
            .send()
            .await
            .map_err(|e| ProviderError::Invocation(format!("Failed to poll run {run_id}: {e}")))?;

        read_run(response)
            .await
            .map_err(|e| ProviderError::Invocation(format!("Polling run {run_id} failed: {e}")))
    }

    /// Reads every item of a dataset, one page at a time.
    ///
    /// Paging follows the reported total when the header is present, otherwise
    /// it stops at the first short page. Records are returned unfiltered.
    pub async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, ProviderError> {
        let url = format!("{}/datasets/{}/items", self.base_url, dataset_id);
        let mut items = Vec::new();
        let mut offset = 0usize;

        loop {
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[
                    ("format", "json".to_string()),
                    ("offset", offset.to_string()),
                    ("limit", DATASET_PAGE_LIMIT.to_string()),
                ])
                .send()
                .await
                .map_err(|e| ProviderError::Dataset(format!("Failed to read dataset {dataset_id}: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::Dataset(format!(
                    "Dataset {dataset_id} returned status {status}: {body}"
                )));
            }

            let total = response
                .headers()
                .get(PAGINATION_TOTAL_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<usize>().ok());
            let page: Vec<Value> = response
                .json()
                .await
                .map_err(|e| ProviderError::Dataset(format!("Malformed dataset page: {e}")))?;
            let page_len = page.len();
            items.extend(page);
            offset += DATASET_PAGE_LIMIT;

            let exhausted = match total {
                Some(total) => offset >= total,
                None => page_len < DATASET_PAGE_LIMIT,
            };
            if page_len == 0 || exhausted {
                break;
            }
        }

        info!("Read {} items from dataset {dataset_id}", items.len());
        Ok(items)
    }
}

async fn read_run(response: reqwest::Response) -> Result<ActorRun, String> {
    let status = response.status();
    let body = response.text().await.map_err(|e| e.to_string())?;
    if !status.is_success() {
        return Err(format!("status {status}: {body}"));
    }
    parse_run(&body)
}

fn parse_run(body: &str) -> Result<ActorRun, String> {
    serde_json::from_str::<Envelope<ActorRun>>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| format!("malformed run response: {e}"))
}

/// Long-poll seconds that leave headroom under the HTTP timeout.
fn wait_for_finish_secs(request_timeout: Duration) -> u64 {
    request_timeout
        .as_secs()
        .saturating_sub(5)
        .clamp(1, MAX_WAIT_FOR_FINISH_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::Query,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    use crate::test_support;

    fn client(base_url: String) -> ApifyClient {
        ApifyClient::new(
            "token".to_string(),
            base_url,
            Duration::from_secs(10),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    /// Dataset of `total` items served in `limit`-sized pages, recording each query.
    fn dataset_router(
        total: usize,
        report_total: bool,
        seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
    ) -> Router {
        Router::new().route(
            "/datasets/:id/items",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let seen = seen.clone();
                async move {
                    let offset: usize = params["offset"].parse().unwrap();
                    let limit: usize = params["limit"].parse().unwrap();
                    seen.lock().unwrap().push(params);
                    let page: Vec<Value> = (offset..(offset + limit).min(total))
                        .map(|i| json!({"i": i}))
                        .collect();
                    let mut headers = axum::http::HeaderMap::new();
                    if report_total {
                        headers.insert(PAGINATION_TOTAL_HEADER, total.to_string().parse().unwrap());
                    }
                    (headers, Json(page))
                }
            }),
        )
    }

    #[test]
    fn test_parse_run_reads_envelope() {
        let body = r#"{"data": {"id": "run1", "actId": "a", "status": "SUCCEEDED", "defaultDatasetId": "ds1"}}"#;
        let run = parse_run(body).unwrap();
        assert_eq!(run.id, "run1");
        assert!(run.succeeded());
        assert_eq!(run.default_dataset_id.as_deref(), Some("ds1"));
    }

    #[test]
    fn test_parse_run_without_dataset() {
        let run = parse_run(r#"{"data": {"id": "r", "status": "RUNNING"}}"#).unwrap();
        assert!(run.default_dataset_id.is_none());
        assert!(!run.is_terminal());
    }

    #[test]
    fn test_parse_run_rejects_garbage() {
        assert!(parse_run("<html>oops</html>").is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        for status in ["SUCCEEDED", "FAILED", "ABORTED", "TIMED-OUT"] {
            let run = ActorRun {
                id: "r".to_string(),
                status: status.to_string(),
                default_dataset_id: None,
            };
            assert!(run.is_terminal(), "{status} should be terminal");
        }
    }

    #[test]
    fn test_wait_for_finish_stays_under_timeout() {
        assert_eq!(wait_for_finish_secs(Duration::from_secs(30)), 25);
        assert_eq!(wait_for_finish_secs(Duration::from_secs(3)), 1);
        assert_eq!(wait_for_finish_secs(Duration::from_secs(600)), 60);
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let result = ApifyClient::new(
            String::new(),
            "https://api.apify.com/v2".to_string(),
            Duration::from_secs(30),
            Duration::from_secs(300),
        );
        assert!(matches!(result, Err(ProviderError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_call_actor_polls_until_terminal() {
        let polls = Arc::new(Mutex::new(0usize));
        let counter = polls.clone();
        let app = Router::new()
            .route(
                "/acts/:actor/runs",
                post(|| async { Json(json!({"data": {"id": "run1", "status": "READY"}})) }),
            )
            .route(
                "/actor-runs/:run",
                get(move || {
                    let counter = counter.clone();
                    async move {
                        let mut n = counter.lock().unwrap();
                        *n += 1;
                        let status = if *n < 2 { "RUNNING" } else { "SUCCEEDED" };
                        Json(json!({"data": {"id": "run1", "status": status, "defaultDatasetId": "ds1"}}))
                    }
                }),
            );
        let base = test_support::serve(app).await;

        let run = client(base).call_actor("actor", &json!({})).await.unwrap();
        assert!(run.succeeded());
        assert_eq!(run.default_dataset_id.as_deref(), Some("ds1"));
        assert_eq!(*polls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_call_actor_reports_failed_run() {
        let app = Router::new().route(
            "/acts/:actor/runs",
            post(|| async { Json(json!({"data": {"id": "run9", "status": "FAILED"}})) }),
        );
        let base = test_support::serve(app).await;

        let err = client(base).call_actor("actor", &json!({})).await.unwrap_err();
        match err {
            ProviderError::RunFailed { run_id, status } => {
                assert_eq!(run_id, "run9");
                assert_eq!(status, "FAILED");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_actor_rejects_error_status() {
        let app = Router::new().route(
            "/acts/:actor/runs",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid token") }),
        );
        let base = test_support::serve(app).await;

        let err = client(base).call_actor("actor", &json!({})).await.unwrap_err();
        match err {
            ProviderError::Invocation(msg) => assert!(msg.contains("invalid token")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dataset_items_reads_every_page() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = test_support::serve(dataset_router(1003, true, seen.clone())).await;

        let items = client(base).dataset_items("ds1").await.unwrap();
        assert_eq!(items.len(), 1003);
        assert_eq!(items[1002], json!({"i": 1002}));

        let seen = seen.lock().unwrap();
        let offsets: Vec<&str> = seen.iter().map(|q| q["offset"].as_str()).collect();
        assert_eq!(offsets, vec!["0", "1000"]);
        assert!(seen.iter().all(|q| !q.contains_key("clean")));
    }

    #[tokio::test]
    async fn test_dataset_items_stops_on_short_page_without_total() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = test_support::serve(dataset_router(3, false, seen.clone())).await;

        let items = client(base).dataset_items("ds1").await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dataset_items_surfaces_server_error() {
        let app = Router::new().route(
            "/datasets/:id/items",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = test_support::serve(app).await;

        let err = client(base).dataset_items("ds1").await.unwrap_err();
        match err {
            ProviderError::Dataset(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
