//! Axum route handlers for the lookup API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lookup::enricher::EnrichmentError;
use crate::lookup::form::{validate_form_input, FormValidation};
use crate::lookup::orchestrator::Orchestrator;
use crate::models::phone::PhoneNumberRecord;
use crate::state::AppState;

pub const INVALID_INPUT: &str = "Invalid input.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberRequest {
    pub phone_number: String,
}

/// `{data, error}`: exactly one side is non-null.
#[derive(Debug, Serialize)]
pub struct DetailsEnvelope {
    pub data: Option<PhoneNumberRecord>,
    pub error: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl DetailsEnvelope {
    fn found(record: PhoneNumberRecord) -> Self {
        Self {
            data: Some(record),
            error: None,
            status: StatusCode::OK,
        }
    }

    fn invalid_input() -> Self {
        Self {
            data: None,
            error: Some(INVALID_INPUT.to_string()),
            status: StatusCode::BAD_REQUEST,
        }
    }

    fn failed(err: &EnrichmentError) -> Self {
        Self {
            data: None,
            error: Some(err.to_string()),
            status: StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for DetailsEnvelope {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// The inbound boundary. Rejects blank input without touching the
/// orchestrator; otherwise returns the record or the enrichment error text.
pub async fn get_phone_number_details(
    orchestrator: &Orchestrator,
    phone_number: &str,
) -> DetailsEnvelope {
    if phone_number.trim().is_empty() {
        return DetailsEnvelope::invalid_input();
    }

    match orchestrator.enrich(phone_number).await {
        Ok(record) => DetailsEnvelope::found(record),
        Err(e) => DetailsEnvelope::failed(&e),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/phone-numbers/details
pub async fn handle_details(
    State(state): State<AppState>,
    payload: Result<Json<PhoneNumberRequest>, JsonRejection>,
) -> DetailsEnvelope {
    match payload {
        Ok(Json(request)) => {
            get_phone_number_details(&state.orchestrator, &request.phone_number).await
        }
        Err(rejection) => {
            debug!("Rejected details request: {}", rejection.body_text());
            DetailsEnvelope::invalid_input()
        }
    }
}

/// POST /api/v1/phone-numbers/validate
///
/// The checks the lookup form runs before submitting. A missing or
/// malformed body is treated as an empty field.
pub async fn handle_validate(
    payload: Result<Json<PhoneNumberRequest>, JsonRejection>,
) -> Json<FormValidation> {
    let phone_number = payload
        .map(|Json(request)| request.phone_number)
        .unwrap_or_default();

    Json(FormValidation::from(validate_form_input(&phone_number)))
}
