//! Shared prompt constants and prompt-building utilities.
//! Each service that needs LLM calls defines its own prompts.rs alongside it.
//! This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps the model from guessing when it is unsure.
pub const NULL_WHEN_UNSURE: &str = "\
    If you cannot determine a field confidently, return null for it. \
    Never return an empty string in place of null.";
