pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::location::handlers as location;
use crate::lookup::handlers as lookup;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Lookup API
        .route(
            "/api/v1/phone-numbers/details",
            post(lookup::handle_details),
        )
        .route(
            "/api/v1/phone-numbers/validate",
            post(lookup::handle_validate),
        )
        // Map placement
        .route("/api/v1/map-view", get(location::handle_map_view))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::lookup::enricher::{EnrichmentError, Enricher, NoopEnricher};
    use crate::lookup::orchestrator::Orchestrator;
    use crate::models::phone::{InferredFields, PhoneNumberRecord};

    struct FixedEnricher;

    #[async_trait]
    impl Enricher for FixedEnricher {
        async fn infer(
            &self,
            _raw: &str,
            partial: &PhoneNumberRecord,
        ) -> Result<InferredFields, EnrichmentError> {
            if partial.country_code.is_none() {
                return Ok(InferredFields::default());
            }
            Ok(InferredFields {
                region_description: Some("California".to_string()),
                carrier: None,
                region_latitude: Some(37.42),
                region_longitude: Some(-122.08),
            })
        }

        fn backend(&self) -> &'static str {
            "fixed"
        }
    }

    fn app(enricher: impl Enricher + 'static) -> Router {
        build_router(AppState {
            orchestrator: Orchestrator::new(Arc::new(enricher), Duration::from_secs(30)),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let (status, body) = send(
            app(NoopEnricher),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "traceit-api");
        assert_eq!(body["enrichment"], "disabled");
    }

    #[tokio::test]
    async fn test_details_success() {
        let (status, body) = send(
            app(FixedEnricher),
            post_json("/api/v1/phone-numbers/details", r#"{"phoneNumber":"+16502530000"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], Value::Null);
        let data = &body["data"];
        assert_eq!(data["countryCode"], "US");
        assert_eq!(data["e164Format"], "+16502530000");
        assert_eq!(data["nationalNumber"], "6502530000");
        assert_eq!(data["isValidNumber"], true);
        assert_eq!(data["regionDescription"], "California");
        assert_eq!(data["carrier"], Value::Null);
        assert!(data["regionLatitude"].is_f64());
        assert!(data["numberType"].is_string());
    }

    #[tokio::test]
    async fn test_details_unparseable_number_is_data() {
        let (status, body) = send(
            app(FixedEnricher),
            post_json("/api/v1/phone-numbers/details", r#"{"phoneNumber":"+1"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isValidNumber"], false);
        assert_eq!(body["data"]["isPossibleNumber"], false);
        assert_eq!(body["data"]["countryCode"], Value::Null);
        assert_eq!(body["data"]["regionDescription"], Value::Null);
    }

    #[tokio::test]
    async fn test_details_invalid_bodies() {
        for body in [
            r#"{"phoneNumber":""}"#,
            r#"{"phoneNumber":16502530000}"#,
            r#"{"number":"+16502530000"}"#,
            "not json",
        ] {
            let (status, response) = send(
                app(FixedEnricher),
                post_json("/api/v1/phone-numbers/details", body),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(response, json!({"data": null, "error": "Invalid input."}));
        }
    }

    #[tokio::test]
    async fn test_validate_endpoint() {
        let (status, body) = send(
            app(NoopEnricher),
            post_json("/api/v1/phone-numbers/validate", r#"{"phoneNumber":"+0123"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(
            body["message"],
            "Please enter a valid international phone number (e.g., +12025550123)."
        );

        let (_, body) = send(
            app(NoopEnricher),
            post_json("/api/v1/phone-numbers/validate", r#"{"phoneNumber":"+12025550123"}"#),
        )
        .await;
        assert_eq!(body, json!({"valid": true, "message": null}));
    }

    #[tokio::test]
    async fn test_map_view_endpoint() {
        let (status, body) = send(
            app(NoopEnricher),
            Request::get("/api/v1/map-view?countryCode=gb")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "country");
        assert_eq!(body["popupText"], "GB");
        assert_eq!(body["zoom"], 5);

        let (status, body) = send(
            app(NoopEnricher),
            Request::get("/api/v1/map-view?latitude=north")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = send(
            app(NoopEnricher),
            Request::get("/api/v1/nope").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
