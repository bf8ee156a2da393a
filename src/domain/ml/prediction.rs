//! Prediction results and the response shapes rendered from them.

use serde::Serialize;

/// Raw output of the classifier for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Probability of repayment (positive class), in [0, 1]
    pub probability: f64,
    /// Classifier's own hard label: 1 = repays, 0 = defaults
    pub class_label: u8,
}

/// Human readable outcome of a credit application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn from_class_label(class_label: u8) -> Self {
        if class_label == 1 {
            Decision::Approved
        } else {
            Decision::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    Online,
}

/// Successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionResponse {
    pub status: ResponseStatus,
    pub probability_of_repayment: f64,
    pub decision: Decision,
    pub class_id: u8,
}

impl DecisionResponse {
    pub fn from_prediction(prediction: Prediction) -> Self {
        Self {
            status: ResponseStatus::Success,
            probability_of_repayment: round_probability(prediction.probability),
            decision: Decision::from_class_label(prediction.class_label),
            class_id: prediction.class_label,
        }
    }
}

/// Failed `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    pub status: ResponseStatus,
    pub model: String,
}

/// Rounds to 4 decimal places, exact ties to even.
pub fn round_probability(p: f64) -> f64 {
    (p * 10_000.0).round_ties_even() / 10_000.0
}
