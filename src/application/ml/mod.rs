pub mod xgboost_predictor;

pub use xgboost_predictor::{MODEL_NAME, XgboostPredictor};
