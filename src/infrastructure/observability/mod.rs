//! Observability for the scoring service
//!
//! Prometheus counters and histograms, rendered as text on `GET /metrics`.

pub mod metrics;

pub use metrics::Metrics;
