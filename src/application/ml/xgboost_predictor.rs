use crate::domain::errors::{ModelLoadError, PredictionError};
use crate::domain::ml::classifier::CreditClassifier;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FEATURE_NAMES, FeatureRow};
use crate::domain::ml::prediction::Prediction;
use crate::infrastructure::xgboost::{Forest, XgbModel};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Model family reported by the health endpoint.
pub const MODEL_NAME: &str = "XGBoost_v1";

const BINARY_OBJECTIVE: &str = "binary:logistic";

/// Decision boundary used by XGBoost's classifier `predict`.
const CLASS_THRESHOLD: f64 = 0.5;

/// Gradient boosted credit classifier loaded from an XGBoost JSON artifact.
pub struct XgboostPredictor {
    forest: Forest,
    model_path: PathBuf,
}

impl XgboostPredictor {
    /// Loads and validates the artifact at `model_path`.
    ///
    /// Fails if the file is missing, unreadable, not a binary `binary:logistic`
    /// classifier, or trained on a different column set than [`FEATURE_NAMES`].
    pub fn load(model_path: impl Into<PathBuf>) -> Result<Self, ModelLoadError> {
        let model_path = model_path.into();
        if !model_path.exists() {
            return Err(ModelLoadError::ModelNotFound { path: model_path });
        }

        let bytes = fs::read(&model_path).map_err(|source| ModelLoadError::Io {
            path: model_path.clone(),
            source,
        })?;
        let model = XgbModel::from_slice(&bytes).map_err(|source| ModelLoadError::Parse {
            path: model_path.clone(),
            source,
        })?;
        debug!(version = ?model.version, "Parsed XGBoost model document");

        ensure_binary_classifier(&model)?;
        ensure_feature_schema(&model)?;
        let forest = Forest::from_model(&model)?;

        info!(
            path = %model_path.display(),
            trees = forest.num_trees(),
            features = forest.num_features(),
            "Successfully loaded XGBoost classifier"
        );

        Ok(Self { forest, model_path })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn num_trees(&self) -> usize {
        self.forest.num_trees()
    }

    /// Probability of repayment for each row.
    pub fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, PredictionError> {
        rows.iter()
            .map(|row| self.forest.predict_probability(row.values()))
            .collect()
    }

    /// Hard class label for each row.
    pub fn predict_class(&self, rows: &[FeatureRow]) -> Result<Vec<u8>, PredictionError> {
        Ok(self
            .predict_proba(rows)?
            .into_iter()
            .map(|p| u8::from(p > CLASS_THRESHOLD))
            .collect())
    }
}

impl CreditClassifier for XgboostPredictor {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Prediction, PredictionError> {
        if rows.is_empty() {
            return Err(PredictionError::EmptyBatch);
        }

        let probabilities = self.predict_proba(rows)?;
        let classes = self.predict_class(rows)?;

        Ok(Prediction {
            probability: probabilities[0],
            class_label: classes[0],
        })
    }

    fn name(&self) -> &str {
        MODEL_NAME
    }
}

/// Tags the model as a binary classifier before any inference happens.
fn ensure_binary_classifier(model: &XgbModel) -> Result<(), ModelLoadError> {
    let objective = &model.learner.objective.name;
    let num_class = model.learner.learner_model_param.n_class;
    if objective != BINARY_OBJECTIVE || num_class > 1 {
        return Err(ModelLoadError::NotBinaryClassifier {
            objective: objective.clone(),
            num_class,
        });
    }
    Ok(())
}

fn ensure_feature_schema(model: &XgbModel) -> Result<(), ModelLoadError> {
    let names = &model.learner.feature_names;
    if !names.is_empty() {
        if let Some((i, (got, want))) = names
            .iter()
            .zip(FEATURE_NAMES)
            .enumerate()
            .find(|(_, (got, want))| got.as_str() != *want)
        {
            return Err(ModelLoadError::SchemaMismatch {
                reason: format!("column {} is '{}', expected '{}'", i, got, want),
            });
        }
        if names.len() != FEATURE_COUNT {
            return Err(ModelLoadError::SchemaMismatch {
                reason: format!(
                    "model has {} named columns, expected {}",
                    names.len(),
                    FEATURE_COUNT
                ),
            });
        }
    }

    let num_feature = model.learner.learner_model_param.n_features;
    if num_feature != FEATURE_COUNT as i64 {
        return Err(ModelLoadError::SchemaMismatch {
            reason: format!(
                "model expects {} features, expected {}",
                num_feature, FEATURE_COUNT
            ),
        });
    }
    Ok(())
}
