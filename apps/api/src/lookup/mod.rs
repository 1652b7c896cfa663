//! Phone number lookup: deterministic parsing, model enrichment, merge.
//! All LLM calls go through llm_client, never directly to Anthropic.

pub mod coerce;
pub mod enricher;
pub mod form;
pub mod handlers;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod timezones;
