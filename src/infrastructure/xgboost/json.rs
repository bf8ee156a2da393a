//! XGBoost JSON model format.
//!
//! Foreign types for the document written by `Booster.save_model("*.json")`.
//! Only the parts needed for tree inference are declared; everything else in
//! the document is ignored.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_with::{DisplayFromStr, serde_as};
use std::collections::HashMap;

/// Accepts `0.5`, `"5E-1"`, `"[5E-1]"` and `[0.5]`.
///
/// XGBoost has written base_score in each of these shapes across versions.
fn deserialize_base_score<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    let mut cur = Value::deserialize(deserializer)?;
    loop {
        match cur {
            Value::Number(n) => {
                return n
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| SerdeError::custom("invalid base_score number"));
            }
            Value::String(s) => {
                let t = s.trim();
                let inner = t
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .unwrap_or(t);
                return inner.trim().parse::<f32>().map_err(|_| {
                    SerdeError::custom(format!("cannot parse base_score from string: {}", s))
                });
            }
            Value::Array(arr) => match arr.into_iter().next() {
                Some(first) => cur = first,
                None => return Err(SerdeError::custom("empty base_score array")),
            },
            _ => {
                return Err(SerdeError::custom(
                    "base_score must be number, string, or array",
                ));
            }
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct TreeParam {
    #[serde_as(as = "DisplayFromStr")]
    pub num_nodes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub tree_param: TreeParam,
    pub left_children: Vec<i32>,
    pub right_children: Vec<i32>,
    pub split_indices: Vec<i32>,
    /// Threshold for split nodes, leaf value for leaves
    pub split_conditions: Vec<f32>,
    pub default_left: Vec<i32>,
    /// 0 = numeric, 1 = categorical
    #[serde(default)]
    pub split_type: Vec<i32>,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct GBTreeModelParam {
    #[serde_as(as = "DisplayFromStr")]
    pub num_parallel_tree: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelTrees {
    pub trees: Vec<Tree>,
    /// Output group of each tree
    #[serde(default)]
    pub tree_info: Vec<i32>,
    pub gbtree_model_param: GBTreeModelParam,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GBTreeDefinition {
    pub model: ModelTrees,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum GradientBooster {
    Gbtree {
        model: ModelTrees,
    },
    Dart {
        gbtree: GBTreeDefinition,
        weight_drop: Vec<f32>,
    },
    Gblinear {},
}

impl GradientBooster {
    pub fn name(&self) -> &'static str {
        match self {
            GradientBooster::Gbtree { .. } => "gbtree",
            GradientBooster::Dart { .. } => "dart",
            GradientBooster::Gblinear {} => "gblinear",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Objective {
    pub name: String,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct LearnerModelParam {
    #[serde(deserialize_with = "deserialize_base_score")]
    pub base_score: f32,
    #[serde(rename = "num_class")]
    #[serde_as(as = "DisplayFromStr")]
    pub n_class: i64,
    #[serde(rename = "num_feature")]
    #[serde_as(as = "DisplayFromStr")]
    pub n_features: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Learner {
    /// Training-time column names; empty when trained on a bare matrix
    #[serde(default)]
    pub feature_names: Vec<String>,
    /// String attributes such as `best_iteration`
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    pub gradient_booster: GradientBooster,
    pub objective: Objective,
    pub learner_model_param: LearnerModelParam,
}

impl Learner {
    /// Boosting round selected by early stopping, if training recorded one.
    pub fn best_iteration(&self) -> Option<usize> {
        self.attributes
            .get("best_iteration")
            .and_then(|v| v.trim().parse::<usize>().ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct XgbModel {
    #[serde(default)]
    pub version: Vec<u32>,
    pub learner: Learner,
}

impl XgbModel {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
