//! Enrichment orchestrator: parse, infer, merge.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::lookup::enricher::{EnrichmentError, Enricher};
use crate::lookup::parser::{self, mask_number};
use crate::models::phone::PhoneNumberRecord;

/// Stateless per call; clones share the enricher.
#[derive(Clone)]
pub struct Orchestrator {
    enricher: Arc<dyn Enricher>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(enricher: Arc<dyn Enricher>, timeout: Duration) -> Self {
        Self { enricher, timeout }
    }

    pub fn backend(&self) -> &'static str {
        self.enricher.backend()
    }

    /// Produces the full record for `raw`.
    ///
    /// A number the parser rejects still yields a record (nulls, validity
    /// flags false). Only a backend that yields nothing usable, or does not
    /// answer within the timeout, fails the call.
    pub async fn enrich(&self, raw: &str) -> Result<PhoneNumberRecord, EnrichmentError> {
        let outcome = parser::parse(raw);
        let partial = outcome.to_record();

        let inferred = tokio::time::timeout(self.timeout, self.enricher.infer(raw, &partial))
            .await
            .map_err(|_| EnrichmentError::Timeout(self.timeout))
            .and_then(|result| result)
            .inspect_err(|e| warn!("Enrichment of {} failed: {e}", mask_number(raw)))?;

        info!(
            "Enriched {} (parsed={}, parse_failure={:?}, backend={}, region={}, carrier={})",
            mask_number(raw),
            outcome.is_parsed(),
            outcome.failure_reason(),
            self.enricher.backend(),
            inferred.region_description.is_some(),
            inferred.carrier.is_some()
        );

        Ok(partial.with_inferred(inferred))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::phone::{InferredFields, NumberType};

    /// Deterministic stand-in for the model backend.
    enum StubEnricher {
        Fixed(InferredFields),
        NoOutput,
        Hang,
    }

    #[async_trait]
    impl Enricher for StubEnricher {
        async fn infer(
            &self,
            _raw: &str,
            _partial: &PhoneNumberRecord,
        ) -> Result<InferredFields, EnrichmentError> {
            match self {
                StubEnricher::Fixed(fields) => Ok(fields.clone()),
                StubEnricher::NoOutput => Err(EnrichmentError::NoOutput),
                StubEnricher::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(InferredFields::default())
                }
            }
        }

        fn backend(&self) -> &'static str {
            "stub"
        }
    }

    /// Counts calls and checks it is handed the parser's record.
    struct RecordingEnricher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Enricher for RecordingEnricher {
        async fn infer(
            &self,
            raw: &str,
            partial: &PhoneNumberRecord,
        ) -> Result<InferredFields, EnrichmentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(*partial, parser::parse(raw).to_record());
            Ok(InferredFields::default())
        }

        fn backend(&self) -> &'static str {
            "recording"
        }
    }

    fn orchestrator(enricher: StubEnricher) -> Orchestrator {
        Orchestrator::new(Arc::new(enricher), Duration::from_secs(30))
    }

    fn california() -> InferredFields {
        InferredFields {
            region_description: Some("California".to_string()),
            carrier: Some("AT&T".to_string()),
            region_latitude: Some(37.42),
            region_longitude: Some(-122.08),
        }
    }

    #[tokio::test]
    async fn test_merges_parser_and_inferred_fields() {
        let record = orchestrator(StubEnricher::Fixed(california()))
            .enrich("+16502530000")
            .await
            .unwrap();

        assert_eq!(record.country_code.as_deref(), Some("US"));
        assert_eq!(record.national_number.as_deref(), Some("6502530000"));
        assert_eq!(record.e164_format.as_deref(), Some("+16502530000"));
        assert_eq!(record.is_valid_number, Some(true));
        assert_eq!(record.is_possible_number, Some(true));
        assert!(record.number_type.is_some());
        assert_eq!(record.region_description.as_deref(), Some("California"));
        assert_eq!(record.carrier.as_deref(), Some("AT&T"));
        assert_eq!(record.region_latitude, Some(37.42));
        assert_eq!(record.region_longitude, Some(-122.08));
    }

    #[tokio::test]
    async fn test_deterministic_fields_are_stable_across_calls() {
        let orchestrator = orchestrator(StubEnricher::Fixed(InferredFields::default()));
        let first = orchestrator.enrich("+16502530000").await.unwrap();
        let second = orchestrator.enrich("+16502530000").await.unwrap();

        assert_eq!(first.country_code, second.country_code);
        assert_eq!(first.e164_format, second.e164_format);
        assert_eq!(first.is_valid_number, second.is_valid_number);
        assert_eq!(first.number_type, second.number_type);
        assert_eq!(first.timezone, second.timezone);
    }

    #[tokio::test]
    async fn test_uk_number_scenario() {
        let record = orchestrator(StubEnricher::Fixed(InferredFields::default()))
            .enrich("+442071234567")
            .await
            .unwrap();

        assert_eq!(record.country_code.as_deref(), Some("GB"));
        assert_eq!(record.e164_format.as_deref(), Some("+442071234567"));
        assert!(record.is_valid_number.is_some());
        assert!(matches!(
            record.number_type,
            Some(NumberType::FixedLine | NumberType::FixedLineOrMobile | NumberType::Unknown)
        ));
    }

    #[tokio::test]
    async fn test_unparseable_number_is_a_record_not_an_error() {
        let record = orchestrator(StubEnricher::Fixed(InferredFields::default()))
            .enrich("+1")
            .await
            .unwrap();

        assert_eq!(record.is_valid_number, Some(false));
        assert_eq!(record.is_possible_number, Some(false));
        assert_eq!(record.country_code, None);
        assert_eq!(record.e164_format, None);
    }

    #[tokio::test]
    async fn test_no_output_is_fatal() {
        let err = orchestrator(StubEnricher::NoOutput)
            .enrich("+16502530000")
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichmentError::NoOutput));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_fatal() {
        let orchestrator =
            Orchestrator::new(Arc::new(StubEnricher::Hang), Duration::from_secs(5));
        let err = orchestrator.enrich("+16502530000").await.unwrap_err();
        assert!(matches!(err, EnrichmentError::Timeout(d) if d == Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_enricher_receives_parser_record_once() {
        let enricher = Arc::new(RecordingEnricher {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Orchestrator::new(enricher.clone(), Duration::from_secs(30));

        orchestrator.enrich("+442071234567").await.unwrap();
        orchestrator.enrich("not a number").await.unwrap();

        assert_eq!(enricher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(orchestrator.backend(), "recording");
    }
}
