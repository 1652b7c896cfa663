mod config;
mod errors;
mod llm_client;
mod location;
mod lookup;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::lookup::enricher::{Enricher, ModelEnricher, NoopEnricher};
use crate::lookup::orchestrator::Orchestrator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
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

    info!("Starting TraceIt API v{}", env!("CARGO_PKG_VERSION"));

    let enricher = build_enricher(&config)?;
    info!(
        "Enricher initialized (backend: {}, timeout: {:?})",
        enricher.backend(),
        config.llm_timeout
    );

    let state = AppState {
        orchestrator: Orchestrator::new(enricher, config.llm_timeout),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// ModelEnricher by default; NoopEnricher when ENABLE_LLM_ENRICHMENT=false.
fn build_enricher(config: &Config) -> Result<Arc<dyn Enricher>> {
    if !config.enable_llm_enrichment {
        return Ok(Arc::new(NoopEnricher));
    }

    let api_key = config
        .anthropic_api_key
        .clone()
        .context("ANTHROPIC_API_KEY is required when LLM enrichment is enabled")?;
    let llm = LlmClient::new(api_key, config.anthropic_api_url.clone())
        .context("Failed to build HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    Ok(Arc::new(ModelEnricher::new(llm)))
}
