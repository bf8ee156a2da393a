use crate::domain::errors::ScoringError;
use crate::domain::ml::classifier::CreditClassifier;
use crate::domain::ml::feature_registry::{FeatureRow, json_type_name};
use crate::domain::ml::prediction::{DecisionResponse, HealthResponse, ResponseStatus};
use crate::infrastructure::observability::Metrics;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Request handling on top of one shared classifier.
///
/// Stateless apart from the read-only classifier handle, so it is cheap to clone
/// into every request.
#[derive(Clone)]
pub struct ScoringService {
    classifier: Arc<dyn CreditClassifier>,
    metrics: Option<Metrics>,
}

impl ScoringService {
    pub fn new(classifier: Arc<dyn CreditClassifier>) -> Self {
        Self {
            classifier,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    /// Parses a raw request body and scores it.
    pub fn score_body(&self, body: &[u8]) -> Result<DecisionResponse, ScoringError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(payload) => self.score(&payload),
            Err(e) => Err(self.record_failure(e.into())),
        }
    }

    /// Rejects a request whose body could not be read, e.g. one over the size limit.
    pub fn reject_body(&self, reason: impl Into<String>) -> ScoringError {
        self.record_failure(ScoringError::UnreadableBody {
            reason: reason.into(),
        })
    }

    /// Validates a decoded payload, runs the classifier and shapes the decision.
    pub fn score(&self, payload: &Value) -> Result<DecisionResponse, ScoringError> {
        self.try_score(payload)
            .map_err(|e| self.record_failure(e))
    }

    fn try_score(&self, payload: &Value) -> Result<DecisionResponse, ScoringError> {
        let object = payload.as_object().ok_or(ScoringError::NotAnObject {
            found: json_type_name(payload),
        })?;
        let row = FeatureRow::from_payload(object)?;

        let started = Instant::now();
        let prediction = self.classifier.predict(std::slice::from_ref(&row))?;
        let elapsed = started.elapsed();

        let response = DecisionResponse::from_prediction(prediction);
        debug!(
            probability = response.probability_of_repayment,
            decision = ?response.decision,
            elapsed_us = elapsed.as_micros() as u64,
            "Scored application"
        );

        if let Some(metrics) = &self.metrics {
            metrics.observe_prediction(response.decision, elapsed);
        }
        Ok(response)
    }

    fn record_failure(&self, error: ScoringError) -> ScoringError {
        warn!(kind = error.kind(), "Rejected scoring request: {}", error);
        if let Some(metrics) = &self.metrics {
            metrics.observe_error(error.kind());
        }
        error
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: ResponseStatus::Online,
            model: self.classifier.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::PredictionError;
    use crate::domain::ml::feature_registry::FEATURE_NAMES;
    use crate::domain::ml::prediction::{Decision, Prediction};
    use serde_json::{Map, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns the credit_score feature as probability and thresholds it at 0.5.
    struct StubClassifier {
        calls: AtomicUsize,
    }

    impl CreditClassifier for StubClassifier {
        fn predict(&self, rows: &[FeatureRow]) -> Result<Prediction, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let row = rows.first().ok_or(PredictionError::EmptyBatch)?;
            let p = row.get("credit_score").unwrap_or(0.0);
            Ok(Prediction {
                probability: p,
                class_label: u8::from(p > 0.5),
            })
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct FailingClassifier;

    impl CreditClassifier for FailingClassifier {
        fn predict(&self, _rows: &[FeatureRow]) -> Result<Prediction, PredictionError> {
            Err(PredictionError::SchemaMismatch {
                expected: 24,
                actual: 23,
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn stub_service() -> (ScoringService, Arc<StubClassifier>) {
        let stub = Arc::new(StubClassifier {
            calls: AtomicUsize::new(0),
        });
        (ScoringService::new(stub.clone()), stub)
    }

    fn payload_with_credit_score(credit_score: f64) -> Value {
        let mut map: Map<String, Value> = FEATURE_NAMES
            .iter()
            .map(|name| (name.to_string(), json!(0.0)))
            .collect();
        map.insert("credit_score".to_string(), json!(credit_score));
        Value::Object(map)
    }

    #[test]
    fn test_score_approves_positive_class() {
        let (service, _) = stub_service();

        let response = service.score(&payload_with_credit_score(0.87654)).unwrap();

        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.probability_of_repayment, 0.8765);
        assert_eq!(response.decision, Decision::Approved);
        assert_eq!(response.class_id, 1);
    }

    #[test]
    fn test_score_rejects_negative_class() {
        let (service, _) = stub_service();

        let response = service.score(&payload_with_credit_score(0.2)).unwrap();

        assert_eq!(response.decision, Decision::Rejected);
        assert_eq!(response.class_id, 0);
    }

    #[test]
    fn test_invalid_payload_never_reaches_classifier() {
        let (service, stub) = stub_service();

        let err = service
            .score(&json!({"annual_income": 0.5, "credit_score": 0.8}))
            .unwrap_err();
        assert!(matches!(err, ScoringError::MissingFeatures { .. }));

        let err = service.score(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::NotAnObject { found: "an array" }
        ));

        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_score_body_rejects_malformed_json() {
        let (service, _) = stub_service();

        let err = service.score_body(b"invalid json").unwrap_err();
        assert!(matches!(err, ScoringError::InvalidJson(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_unreadable_body_is_counted() {
        let metrics = Metrics::new().unwrap();
        let (service, stub) = stub_service();
        let service = service.with_metrics(metrics.clone());

        let err = service.reject_body("length limit exceeded");
        assert_eq!(err.kind(), "unreadable_body");
        assert!(err.to_string().contains("length limit exceeded"));
        assert_eq!(
            metrics
                .prediction_errors_total
                .with_label_values(&["unreadable_body"])
                .get(),
            1.0
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prediction_failure_is_propagated() {
        let service = ScoringService::new(Arc::new(FailingClassifier));

        let err = service.score(&payload_with_credit_score(0.9)).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Prediction(PredictionError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_health_reports_classifier_name() {
        let (service, _) = stub_service();
        let _ = service.score_body(b"{");

        let health = service.health();
        assert_eq!(health.status, ResponseStatus::Online);
        assert_eq!(health.model, "stub");
    }

    #[test]
    fn test_metrics_count_outcomes() {
        let metrics = Metrics::new().unwrap();
        let (service, _) = stub_service();
        let service = service.with_metrics(metrics.clone());

        service.score(&payload_with_credit_score(0.9)).unwrap();
        service.score(&payload_with_credit_score(0.1)).unwrap();
        let _ = service.score_body(b"not json");

        assert_eq!(
            metrics
                .predictions_total
                .with_label_values(&["Approved"])
                .get(),
            1.0
        );
        assert_eq!(
            metrics
                .predictions_total
                .with_label_values(&["Rejected"])
                .get(),
            1.0
        );
        assert_eq!(
            metrics
                .prediction_errors_total
                .with_label_values(&["invalid_json"])
                .get(),
            1.0
        );
    }
}
