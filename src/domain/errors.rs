use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a model artifact into a ready classifier.
///
/// All of these are fatal: the server refuses to start without a model.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Model file not found: {}", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("Failed to read model file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Model is not a binary classifier: objective '{objective}' with {num_class} classes")]
    NotBinaryClassifier { objective: String, num_class: i64 },

    #[error("Unsupported booster '{booster}': only gbtree and dart are supported")]
    UnsupportedBooster { booster: String },

    #[error("Unsupported categorical split in tree {tree} at node {node}")]
    UnsupportedSplit { tree: usize, node: usize },

    #[error("Invalid tree {tree}: {reason}")]
    InvalidTree { tree: usize, reason: String },

    #[error("Model schema mismatch: {reason}")]
    SchemaMismatch { reason: String },
}

/// Errors raised by an inference call.
#[derive(Debug, Error, PartialEq)]
pub enum PredictionError {
    #[error("Prediction requires at least one row")]
    EmptyBatch,

    #[error("Feature shape mismatch: model expects {expected} features, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },
}

/// Request-scoped failures of the scoring endpoint.
///
/// Each variant is a caller error: the request is rejected and the server keeps serving.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Unreadable request body: {reason}")]
    UnreadableBody { reason: String },

    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Request body must be a JSON object of features, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Missing features: {}", names.join(", "))]
    MissingFeatures { names: Vec<String> },

    #[error("Unexpected features: {}", names.join(", "))]
    UnexpectedFeatures { names: Vec<String> },

    #[error("Feature '{name}' must be numeric, got {found}")]
    NonNumericFeature { name: String, found: &'static str },

    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictionError),
}

impl ScoringError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::UnreadableBody { .. } => "unreadable_body",
            ScoringError::InvalidJson(_) => "invalid_json",
            ScoringError::NotAnObject { .. } => "not_an_object",
            ScoringError::MissingFeatures { .. } => "missing_features",
            ScoringError::UnexpectedFeatures { .. } => "unexpected_features",
            ScoringError::NonNumericFeature { .. } => "non_numeric_feature",
            ScoringError::Prediction(_) => "prediction",
        }
    }
}
