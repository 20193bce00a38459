mod analysis;
mod config;
mod errors;
mod extraction;
mod jobs;
mod keywords;
mod llm_client;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::config::Config;
use crate::extraction::PdfTextExtractor;
use crate::jobs::apify::ApifyClient;
use crate::jobs::providers::{LinkedInProvider, NaukriProvider};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing API keys)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job recommender v{}", env!("CARGO_PKG_VERSION"));

    let remote_timeout = Duration::from_secs(config.remote_timeout_secs);

    // Initialize LLM client
    let llm = Arc::new(
        LlmClient::new(
            config.openrouter_api_key.clone(),
            config.openrouter_api_url.clone(),
            config.llm_model.clone(),
            remote_timeout,
        )
        .context("Failed to initialize LLM client")?,
    );
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize job providers (both share one Apify client)
    let apify = ApifyClient::new(
        config.apify_api_key.clone(),
        config.apify_api_url.clone(),
        remote_timeout,
        Duration::from_secs(config.apify_run_timeout_secs),
    )
    .context("Failed to initialize Apify client")?;
    let linkedin = Arc::new(LinkedInProvider::new(
        apify.clone(),
        config.linkedin_actor_id.clone(),
    ));
    let naukri = Arc::new(NaukriProvider::new(apify, config.naukri_actor_id.clone()));
    info!(
        "Job providers initialized (LinkedIn actor: {}, Naukri actor: {})",
        config.linkedin_actor_id, config.naukri_actor_id
    );

    let analyzer = Arc::new(ResumeAnalyzer::new(Arc::new(PdfTextExtractor), llm.clone()));

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm,
        analyzer,
        linkedin,
        naukri,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
