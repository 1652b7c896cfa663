use crate::lookup::orchestrator::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Parser + pluggable enricher. Default enricher: ModelEnricher.
    /// Swap via ENABLE_LLM_ENRICHMENT env.
    pub orchestrator: Orchestrator,
}
