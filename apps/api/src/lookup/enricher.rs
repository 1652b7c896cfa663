//! Enricher: pluggable, trait-based backend for the fields no numbering-plan
//! library can answer (region name, carrier, approximate coordinates).
//!
//! Default: `ModelEnricher` (Claude with the parser bound as a tool).
//! `NoopEnricher` answers null for everything and is used when LLM
//! enrichment is disabled.
//!
//! `AppState` holds an `Arc<dyn Enricher>`, swapped at startup via config.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NULL_WHEN_UNSURE};
use crate::llm_client::{
    strip_json_fences, ContentBlock, LlmClient, LlmError, Message, MessagesApi,
    ToolDefinition, ToolUse,
};
use crate::lookup::coerce::{coerce_bool, coerce_string, inferred_fields};
use crate::lookup::parser;
use crate::lookup::prompts::{
    PARSER_TOOL_DESCRIPTION, PARSER_TOOL_NAME, PHONE_ANALYST_SYSTEM,
    PHONE_LOOKUP_PROMPT_TEMPLATE,
};
use crate::models::phone::{InferredFields, PhoneNumberRecord};

/// Tool rounds allowed before the model must answer. One is expected.
const MAX_TOOL_ROUNDS: usize = 2;

/// The single fatal condition of a lookup: the backend produced no usable output.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("The AI prompt did not return a valid output for parsing the phone number.")]
    NoOutput,

    #[error("The AI prompt returned output that is not a JSON object: {0}")]
    MalformedOutput(String),

    #[error("The AI prompt did not return within {0:?}.")]
    Timeout(Duration),

    #[error("The AI prompt kept calling tools after {0} rounds.")]
    TooManyToolRounds(usize),

    #[error("LLM error: {0}")]
    Backend(#[from] LlmError),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap inference backends without touching the
/// orchestrator or the handlers.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// `partial` is the parser's record for `raw`.
    async fn infer(
        &self,
        raw: &str,
        partial: &PhoneNumberRecord,
    ) -> Result<InferredFields, EnrichmentError>;

    /// Short backend name, reported by the health endpoint.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// NoopEnricher
// ────────────────────────────────────────────────────────────────────────────

pub struct NoopEnricher;

#[async_trait]
impl Enricher for NoopEnricher {
    async fn infer(
        &self,
        _raw: &str,
        _partial: &PhoneNumberRecord,
    ) -> Result<InferredFields, EnrichmentError> {
        Ok(InferredFields::default())
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ModelEnricher
// ────────────────────────────────────────────────────────────────────────────

/// Asks the model for the subjective fields, with the parser adapter bound as
/// a tool so the model reasons over library facts instead of guessing them.
pub struct ModelEnricher<C = LlmClient> {
    client: C,
}

impl<C: MessagesApi> ModelEnricher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: MessagesApi> Enricher for ModelEnricher<C> {
    async fn infer(
        &self,
        raw: &str,
        partial: &PhoneNumberRecord,
    ) -> Result<InferredFields, EnrichmentError> {
        let system = format!("{PHONE_ANALYST_SYSTEM} {JSON_ONLY_SYSTEM} {NULL_WHEN_UNSURE}");
        let prompt = PHONE_LOOKUP_PROMPT_TEMPLATE.replace("{phone_number}", raw);
        let tools = [parser_tool()];

        let mut messages = vec![Message::user_text(prompt)];
        let mut rounds = 0;

        loop {
            let response = self.client.send(&system, &messages, &tools).await?;
            let uses = response.tool_uses();

            if uses.is_empty() {
                let text = response.text().ok_or(EnrichmentError::NoOutput)?;
                let output = parse_output(text)?;
                note_disagreements(partial, &output);
                return Ok(inferred_fields(&output));
            }

            if rounds == MAX_TOOL_ROUNDS {
                return Err(EnrichmentError::TooManyToolRounds(MAX_TOOL_ROUNDS));
            }
            rounds += 1;

            let results = uses.iter().map(run_tool).collect();
            messages.push(Message::assistant(&response.content));
            messages.push(Message::tool_results(results));
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn parser_tool() -> ToolDefinition {
    ToolDefinition {
        name: PARSER_TOOL_NAME,
        description: PARSER_TOOL_DESCRIPTION,
        input_schema: json!({
            "type": "object",
            "properties": {
                "phoneNumber": {
                    "type": "string",
                    "description": "The phone number to parse, in international format (e.g., +16502530000)."
                }
            },
            "required": ["phoneNumber"]
        }),
    }
}

/// Executes one tool call. Failures go back to the model as error results.
fn run_tool(tool_use: &ToolUse<'_>) -> ContentBlock {
    let result = if tool_use.name != PARSER_TOOL_NAME {
        Err(format!("Unknown tool '{}'", tool_use.name))
    } else {
        match tool_use.input.get("phoneNumber").and_then(Value::as_str) {
            Some(phone_number) => {
                debug!("Model called {} for {}", PARSER_TOOL_NAME, parser::mask_number(phone_number));
                serde_json::to_string(&parser::parse(phone_number).to_record())
                    .map_err(|e| format!("Could not encode tool output: {e}"))
            }
            None => Err("Input must contain a 'phoneNumber' string".to_string()),
        }
    };

    match result {
        Ok(content) => ContentBlock::ToolResult {
            tool_use_id: tool_use.id.to_string(),
            content,
            is_error: false,
        },
        Err(message) => {
            warn!("Tool call failed: {message}");
            ContentBlock::ToolResult {
                tool_use_id: tool_use.id.to_string(),
                content: message,
                is_error: true,
            }
        }
    }
}

/// The final answer must be a JSON object. A literal `null` counts as no output.
fn parse_output(text: &str) -> Result<Map<String, Value>, EnrichmentError> {
    let value: Value = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| EnrichmentError::MalformedOutput(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(EnrichmentError::NoOutput),
        other => Err(EnrichmentError::MalformedOutput(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Parser values are authoritative; a differing echo from the model is only logged.
fn note_disagreements(partial: &PhoneNumberRecord, output: &Map<String, Value>) {
    let strings = [
        ("countryCode", &partial.country_code),
        ("nationalNumber", &partial.national_number),
        ("e164Format", &partial.e164_format),
    ];
    for (field, parsed) in strings {
        if let Some(echoed) = coerce_string(output.get(field)) {
            if parsed.as_deref() != Some(echoed.as_str()) {
                debug!("Model disagreed with parser on {field}; keeping parser value");
            }
        }
    }

    let flags = [
        ("isValidNumber", partial.is_valid_number),
        ("isPossibleNumber", partial.is_possible_number),
    ];
    for (field, parsed) in flags {
        if let Some(echoed) = coerce_bool(output.get(field)) {
            if parsed != Some(echoed) {
                debug!("Model disagreed with parser on {field}; keeping parser value");
            }
        }
    }
}
