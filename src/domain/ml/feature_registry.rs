use crate::domain::errors::ScoringError;
use serde_json::{Map, Value};

/// Ordered list of feature names.
/// This order MUST match the column order the classifier was trained on.
/// Any change here is a breaking change for the model artifact.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    // Scaled continuous
    "annual_income",
    "debt_to_income_ratio",
    "credit_score",
    "loan_amount",
    "interest_rate",
    // Encoded ordinal / label
    "education_level_ord",
    "grade_subgrade_le",
    // One-hot, first category dropped per group
    "gender_Male",
    "gender_Other",
    "marital_status_Married",
    "marital_status_Single",
    "marital_status_Widowed",
    "employment_status_Retired",
    "employment_status_Self-employed",
    "employment_status_Student",
    "employment_status_Unemployed",
    "loan_purpose_Car",
    "loan_purpose_Debt consolidation",
    "loan_purpose_Education",
    "loan_purpose_Home",
    "loan_purpose_Medical",
    "loan_purpose_Other",
    "loan_purpose_Vacation",
];

pub const FEATURE_COUNT: usize = 23;

/// Position of a feature in the model input, if it belongs to the schema.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|n| *n == name)
}

/// One applicant, as a fixed-width numeric row in schema order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    values: [f64; FEATURE_COUNT],
}

impl FeatureRow {
    /// Validates a decoded JSON object against the schema and builds a row.
    ///
    /// Checks run in a fixed order: missing keys, then unknown keys, then value
    /// types. Missing names are reported in schema order.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ScoringError> {
        let missing: Vec<String> = FEATURE_NAMES
            .iter()
            .filter(|name| !payload.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ScoringError::MissingFeatures { names: missing });
        }

        let unexpected: Vec<String> = payload
            .keys()
            .filter(|key| feature_index(key).is_none())
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            return Err(ScoringError::UnexpectedFeatures { names: unexpected });
        }

        let mut values = [0.0; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            let value = &payload[name];
            *slot = match value {
                Value::Number(n) => n.as_f64(),
                _ => None,
            }
            .ok_or_else(|| ScoringError::NonNumericFeature {
                name: name.to_string(),
                found: json_type_name(value),
            })?;
        }

        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.values[i])
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
