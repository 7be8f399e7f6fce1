//! Random forest classifier evaluated from a serialized tree dump.
//!
//! Each tree is a flat node array rooted at index 0. Children are always
//! stored after their parent, which `validate` enforces, so traversal always
//! terminates.
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::models::classifier_trait::{check_width, ClassifierModel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Rows with `x[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        impurity: f64,
        #[serde(default)]
        weighted_n_samples: f64,
    },
    /// Class weights `[negative, positive]` of the training rows in the leaf.
    Leaf {
        value: [f64; 2],
        #[serde(default)]
        impurity: f64,
        #[serde(default)]
        weighted_n_samples: f64,
    },
}

impl TreeNode {
    fn stats(&self) -> (f64, f64) {
        match self {
            TreeNode::Split {
                impurity,
                weighted_n_samples,
                ..
            }
            | TreeNode::Leaf {
                impurity,
                weighted_n_samples,
                ..
            } => (*weighted_n_samples, *impurity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Positive-class fraction of the leaf `row` falls into.
    fn leaf_proba(&self, row: &[f64]) -> Result<f64, PredictionError> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                }) => {
                    let value = row.get(*feature).ok_or(PredictionError::ShapeMismatch {
                        expected: feature + 1,
                        found: row.len(),
                    })?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value, .. }) => return Ok(value[1] / (value[0] + value[1])),
                None => {
                    return Err(PredictionError::Model(format!(
                        "tree node {} does not exist",
                        idx
                    )))
                }
            }
        }
        Err(PredictionError::Model(
            "tree traversal did not reach a leaf".to_string(),
        ))
    }

    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let len = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but the model has {} features",
                            idx, feature, n_features
                        ));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= len {
                            return Err(format!("node {} has invalid child index {}", idx, child));
                        }
                    }
                }
                TreeNode::Leaf { value, .. } => {
                    let valid = value.iter().all(|v| v.is_finite() && *v >= 0.0);
                    if !valid || value[0] + value[1] <= 0.0 {
                        return Err(format!("leaf {} has invalid class weights {:?}", idx, value));
                    }
                }
            }
        }
        Ok(())
    }

    /// Unnormalized mean-decrease-in-impurity per feature. `None` when a
    /// split points at a missing child or an unknown feature.
    fn impurity_decrease(&self, n_features: usize) -> Option<Vec<f64>> {
        let mut importances = vec![0.0; n_features];
        for node in &self.nodes {
            if let TreeNode::Split {
                feature,
                left,
                right,
                impurity,
                weighted_n_samples,
                ..
            } = node
            {
                let (lw, li) = self.nodes.get(*left)?.stats();
                let (rw, ri) = self.nodes.get(*right)?.stats();
                *importances.get_mut(*feature)? +=
                    weighted_n_samples * impurity - lw * li - rw * ri;
            }
        }
        Some(importances)
    }
}

/// Ensemble of decision trees voting by averaged class probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    #[serde(default)]
    pub feature_names_in: Option<Vec<String>>,
    /// Importances exported alongside the trees. When absent they are
    /// recomputed from node statistics.
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Check structural invariants. Called once when the model is loaded.
    pub fn validate(&self) -> Result<(), PredictionError> {
        if self.trees.is_empty() {
            return Err(PredictionError::Model("random forest has no trees".to_string()));
        }
        if let Some(names) = &self.feature_names_in {
            if names.len() != self.n_features {
                return Err(PredictionError::ShapeMismatch {
                    expected: self.n_features,
                    found: names.len(),
                });
            }
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|msg| PredictionError::Model(format!("tree {}: {}", i, msg)))?;
        }
        Ok(())
    }

    fn impurity_importances(&self) -> Option<Vec<f64>> {
        let has_stats = self
            .trees
            .iter()
            .any(|t| t.nodes.iter().any(|n| n.stats().0 > 0.0));
        if !has_stats {
            return None;
        }

        let mut total = vec![0.0; self.n_features];
        for tree in &self.trees {
            let per_tree = tree.impurity_decrease(self.n_features)?;
            let sum: f64 = per_tree.iter().sum();
            if sum > 0.0 {
                for (t, v) in total.iter_mut().zip(per_tree) {
                    *t += v / sum;
                }
            }
        }
        let n_trees = self.trees.len() as f64;
        total.iter_mut().for_each(|v| *v /= n_trees);

        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            total.iter_mut().for_each(|v| *v /= sum);
        }
        Some(total)
    }
}

impl ClassifierModel for RandomForest {
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>, PredictionError> {
        check_width(self, x)?;
        let n_trees = self.trees.len() as f64;
        x.outer_iter()
            .map(|row| -> Result<f64, PredictionError> {
                let row = row.to_vec();
                let mut sum = 0.0;
                for tree in &self.trees {
                    sum += tree.leaf_proba(&row)?;
                }
                Ok(sum / n_trees)
            })
            .collect()
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.feature_importances
            .clone()
            .or_else(|| self.impurity_importances())
    }

    fn feature_names_in(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}
