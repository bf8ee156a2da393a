#![allow(dead_code)]

use credit_scoring::domain::ml::feature_registry::FEATURE_NAMES;
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use uuid::Uuid;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/credit_model.json")
}

pub fn fixture_json() -> Value {
    let raw = std::fs::read_to_string(fixture_path()).expect("fixture model is readable");
    serde_json::from_str(&raw).expect("fixture model is valid JSON")
}

/// Writes `model` to a unique file under the system temp dir.
pub fn write_temp_model(model: &Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!("credit-model-{}.json", Uuid::new_v4()));
    std::fs::write(&path, model.to_string()).expect("temp model is writable");
    path
}

/// The applicant used in the service documentation: margin 0.8 + 0.3.
pub fn example_applicant() -> Value {
    json!({
        "annual_income": 0.5,
        "debt_to_income_ratio": -0.3,
        "credit_score": 0.8,
        "loan_amount": -0.2,
        "interest_rate": 0.1,
        "education_level_ord": 1,
        "grade_subgrade_le": 10,
        "gender_Male": 0.0,
        "gender_Other": 0.0,
        "marital_status_Married": 1.0,
        "marital_status_Single": 0.0,
        "marital_status_Widowed": 0.0,
        "employment_status_Retired": 0.0,
        "employment_status_Self-employed": 0.0,
        "employment_status_Student": 0.0,
        "employment_status_Unemployed": 0.0,
        "loan_purpose_Car": 0.0,
        "loan_purpose_Debt consolidation": 0.0,
        "loan_purpose_Education": 0.0,
        "loan_purpose_Home": 1.0,
        "loan_purpose_Medical": 0.0,
        "loan_purpose_Other": 0.0,
        "loan_purpose_Vacation": 0.0
    })
}

/// Every feature at zero: margin 0.8 + 0.1.
pub fn zero_applicant() -> Value {
    let map: Map<String, Value> = FEATURE_NAMES
        .iter()
        .map(|name| (name.to_string(), json!(0.0)))
        .collect();
    Value::Object(map)
}

/// Low credit score and high debt ratio: margin -0.6 - 0.9.
pub fn risky_applicant() -> Value {
    let mut applicant = zero_applicant();
    applicant["credit_score"] = json!(-1.0);
    applicant["debt_to_income_ratio"] = json!(0.5);
    applicant
}
