//! Compiled tree ensemble evaluated at inference time.

use super::json::{GradientBooster, ModelTrees, Tree as XgbTree, XgbModel};
use crate::domain::errors::{ModelLoadError, PredictionError};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        default_left: bool,
        left: usize,
        right: usize,
    },
    Leaf(f32),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Box<[Node]>,
}

impl Tree {
    /// Walks from the root to a leaf.
    ///
    /// Values are compared in `f32` as XGBoost does; NaN follows the default branch.
    fn leaf_value(&self, row: &[f64]) -> f32 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    default_left,
                    left,
                    right,
                } => {
                    let value = row[feature] as f32;
                    let go_left = if value.is_nan() {
                        default_left
                    } else {
                        value < threshold
                    };
                    idx = if go_left { left } else { right };
                }
            }
        }
    }
}

/// Gradient boosted tree ensemble for a single output group.
#[derive(Debug, Clone)]
pub struct Forest {
    trees: Vec<Tree>,
    /// Per-tree scale, 1.0 except for DART models
    weights: Vec<f32>,
    base_margin: f32,
    num_features: usize,
}

impl Forest {
    /// Converts a parsed model into an evaluable forest.
    ///
    /// Honors `best_iteration` by dropping trees past the early-stopping round.
    pub fn from_model(model: &XgbModel) -> Result<Self, ModelLoadError> {
        let learner = &model.learner;
        let (model_trees, weight_drop) = match &learner.gradient_booster {
            GradientBooster::Gbtree { model } => (model, None),
            GradientBooster::Dart {
                gbtree,
                weight_drop,
            } => (&gbtree.model, Some(weight_drop)),
            booster @ GradientBooster::Gblinear {} => {
                return Err(ModelLoadError::UnsupportedBooster {
                    booster: booster.name().to_string(),
                });
            }
        };

        let num_features = usize::try_from(learner.learner_model_param.n_features).map_err(|_| {
            ModelLoadError::SchemaMismatch {
                reason: format!(
                    "invalid feature count {}",
                    learner.learner_model_param.n_features
                ),
            }
        })?;

        let limit = tree_limit(model_trees, learner.best_iteration());
        let mut trees = Vec::with_capacity(limit);
        for (tree_idx, xgb_tree) in model_trees.trees.iter().take(limit).enumerate() {
            // Binary logistic models write every tree to output group 0
            let group = model_trees.tree_info.get(tree_idx).copied().unwrap_or(0);
            if group != 0 {
                return Err(ModelLoadError::InvalidTree {
                    tree: tree_idx,
                    reason: format!("tree belongs to output group {}, expected 0", group),
                });
            }
            trees.push(convert_tree(xgb_tree, tree_idx, num_features)?);
        }

        let weights = match weight_drop {
            Some(w) if w.len() < trees.len() => {
                return Err(ModelLoadError::InvalidTree {
                    tree: w.len(),
                    reason: format!("missing DART weight ({} weights for {} trees)", w.len(), trees.len()),
                });
            }
            Some(w) => w[..trees.len()].to_vec(),
            None => vec![1.0; trees.len()],
        };

        Ok(Self {
            trees,
            weights,
            base_margin: prob_to_margin(learner.learner_model_param.base_score),
            num_features,
        })
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Raw margin (log-odds) for one row.
    pub fn predict_margin(&self, row: &[f64]) -> Result<f32, PredictionError> {
        if row.len() != self.num_features {
            return Err(PredictionError::SchemaMismatch {
                expected: self.num_features,
                actual: row.len(),
            });
        }

        // Accumulate onto the base margin in tree order, as XGBoost does
        Ok(self
            .trees
            .iter()
            .zip(&self.weights)
            .fold(self.base_margin, |acc, (tree, weight)| {
                acc + tree.leaf_value(row) * weight
            }))
    }

    /// Probability of the positive class for one row.
    pub fn predict_probability(&self, row: &[f64]) -> Result<f64, PredictionError> {
        self.predict_margin(row).map(|m| f64::from(sigmoid(m)))
    }
}

fn sigmoid(margin: f32) -> f32 {
    1.0 / (1.0 + (-margin).exp())
}

/// Converts base_score from probability space to margin space (logit).
fn prob_to_margin(base_score: f32) -> f32 {
    let p = base_score.clamp(1e-7, 1.0 - 1e-7);
    (p / (1.0 - p)).ln()
}

/// Number of leading trees to evaluate.
fn tree_limit(model_trees: &ModelTrees, best_iteration: Option<usize>) -> usize {
    let total = model_trees.trees.len();
    let per_round = model_trees.gbtree_model_param.num_parallel_tree.max(1) as usize;
    match best_iteration {
        Some(round) => total.min(round.saturating_add(1).saturating_mul(per_round)),
        None => total,
    }
}

fn convert_tree(
    xgb_tree: &XgbTree,
    tree_idx: usize,
    num_features: usize,
) -> Result<Tree, ModelLoadError> {
    let invalid = |reason: String| ModelLoadError::InvalidTree {
        tree: tree_idx,
        reason,
    };

    let num_nodes = xgb_tree.tree_param.num_nodes.max(0) as usize;
    if num_nodes == 0 {
        return Err(invalid("tree has no nodes".to_string()));
    }
    let lengths = [
        xgb_tree.left_children.len(),
        xgb_tree.right_children.len(),
        xgb_tree.split_indices.len(),
        xgb_tree.split_conditions.len(),
        xgb_tree.default_left.len(),
    ];
    if lengths.iter().any(|&len| len != num_nodes) {
        return Err(invalid(format!(
            "node arrays {:?} do not match num_nodes {}",
            lengths, num_nodes
        )));
    }

    let mut nodes = Vec::with_capacity(num_nodes);
    for node_idx in 0..num_nodes {
        let left_child = xgb_tree.left_children[node_idx];
        let right_child = xgb_tree.right_children[node_idx];

        // A node is a leaf if left_child == -1 (XGBoost convention)
        if left_child == -1 {
            nodes.push(Node::Leaf(xgb_tree.split_conditions[node_idx]));
            continue;
        }

        if xgb_tree.split_type.get(node_idx).copied().unwrap_or(0) == 1 {
            return Err(ModelLoadError::UnsupportedSplit {
                tree: tree_idx,
                node: node_idx,
            });
        }

        // Children are allocated after their parent, which also rules out cycles
        let child = |c: i32| -> Result<usize, ModelLoadError> {
            match usize::try_from(c) {
                Ok(c) if c > node_idx && c < num_nodes => Ok(c),
                _ => Err(invalid(format!(
                    "node {} references child {} but tree has {} nodes",
                    node_idx, c, num_nodes
                ))),
            }
        };
        let left = child(left_child)?;
        let right = child(right_child)?;

        let feature = usize::try_from(xgb_tree.split_indices[node_idx])
            .ok()
            .filter(|&f| f < num_features)
            .ok_or_else(|| {
                invalid(format!(
                    "node {} splits on feature {} but model has {} features",
                    node_idx, xgb_tree.split_indices[node_idx], num_features
                ))
            })?;

        nodes.push(Node::Split {
            feature,
            threshold: xgb_tree.split_conditions[node_idx],
            default_left: xgb_tree.default_left[node_idx] != 0,
            left,
            right,
        });
    }

    Ok(Tree {
        nodes: nodes.into_boxed_slice(),
    })
}
