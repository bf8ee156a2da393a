use super::feature_registry::FeatureRow;
use super::prediction::Prediction;
use crate::domain::errors::PredictionError;

/// Interface for a loaded binary credit classifier.
///
/// Implementations are immutable after construction, so one instance can be
/// shared by every request without locking.
pub trait CreditClassifier: Send + Sync {
    /// Probability of repayment and hard class label for the first row of `rows`.
    fn predict(&self, rows: &[FeatureRow]) -> Result<Prediction, PredictionError>;

    /// Get model name/type
    fn name(&self) -> &str;
}
