//! XGBoost model artifacts: JSON parsing and tree ensemble evaluation.

pub mod forest;
pub mod json;

pub use forest::Forest;
pub use json::XgbModel;
