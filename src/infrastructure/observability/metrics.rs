//! Prometheus metrics definitions for the scoring service
//!
//! All metrics use the `credit_scoring_` prefix.

use crate::domain::ml::prediction::Decision;
use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;
use std::time::Duration;

/// Prometheus metrics for the scoring pipeline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Scored applications by decision
    pub predictions_total: CounterVec,
    /// Rejected requests by error kind
    pub prediction_errors_total: CounterVec,
    /// Classifier latency in seconds
    pub inference_latency_seconds: HistogramVec,
    /// Trees in the loaded ensemble
    pub model_trees: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new(
                "credit_scoring_predictions_total",
                "Scored credit applications by decision",
            ),
            &["decision"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_errors_total = CounterVec::new(
            Opts::new(
                "credit_scoring_prediction_errors_total",
                "Rejected scoring requests by error kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(prediction_errors_total.clone()))?;

        let inference_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "credit_scoring_inference_latency_seconds",
                "Classifier inference latency in seconds",
            )
            .buckets(vec![0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01]),
            &["model"],
        )?;
        registry.register(Box::new(inference_latency_seconds.clone()))?;

        let model_trees = Gauge::with_opts(Opts::new(
            "credit_scoring_model_trees",
            "Number of trees in the loaded model",
        ))?;
        registry.register(Box::new(model_trees.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            prediction_errors_total,
            inference_latency_seconds,
            model_trees,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    /// Count a successful prediction and its latency
    pub fn observe_prediction(&self, decision: Decision, latency: Duration) {
        self.predictions_total
            .with_label_values(&[decision.as_str()])
            .inc();
        self.inference_latency_seconds
            .with_label_values(&["xgboost"])
            .observe(latency.as_secs_f64());
    }

    /// Count a rejected request
    pub fn observe_error(&self, kind: &str) {
        self.prediction_errors_total
            .with_label_values(&[kind])
            .inc();
    }
}
