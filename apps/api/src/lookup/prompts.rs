//! All LLM prompt constants for the lookup module.
//! Reuses cross-cutting fragments from llm_client::prompts.

/// Name of the parser tool as the model sees it.
pub const PARSER_TOOL_NAME: &str = "parsePhoneNumberLibTool";

pub const PARSER_TOOL_DESCRIPTION: &str = "Parses a phone number with a numbering-plan \
    library to get basic details. Provides countryCode, nationalNumber, e164Format, \
    timezone, isValidNumber, numberType and isPossibleNumber. Always returns null for \
    regionDescription, carrier, regionLatitude and regionLongitude; those must be \
    determined by you.";

/// Persona for the lookup call. The JSON-only fragment is appended at runtime.
pub const PHONE_ANALYST_SYSTEM: &str = "You are a phone number analysis expert.";

/// Lookup prompt template. Replace `{phone_number}` before sending.
pub const PHONE_LOOKUP_PROMPT_TEMPLATE: &str = r#"Phone number to analyze: {phone_number}

First, call the 'parsePhoneNumberLibTool' tool with this phone number to get its foundational details:
countryCode (e.g. "US", "IN"), nationalNumber, e164Format, timezone, isValidNumber, numberType and isPossibleNumber.
Do NOT restate or correct those values; they are authoritative.

Using the tool's countryCode and nationalNumber together with your general knowledge, determine:
1. "regionDescription": the specific state or region name (e.g. "California", "West Bengal", "New South Wales"), not just the country name.
2. "carrier": the telecommunications company serving the number (e.g. "Verizon", "Reliance Jio", "Vodafone").
3. "regionLatitude" and "regionLongitude": approximate decimal-degree coordinates of that region's center.

Return a JSON object with this EXACT schema (no extra fields):
{
  "regionDescription": "California",
  "carrier": "Verizon",
  "regionLatitude": 36.78,
  "regionLongitude": -119.42
}"#;
