pub mod observability;
pub mod xgboost;
