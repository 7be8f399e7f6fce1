//! Ranked feature importances for tree-based classifiers.
use serde::{Deserialize, Serialize};

use crate::models::Model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Placeholder labels used when the available names do not line up with the
/// importance vector. Semantic labels are lost.
fn synthetic_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Feature_{}", i)).collect()
}

/// The `top_n` most important features, highest score first.
///
/// For pipelines the preprocessor's output names replace `feature_names`
/// when it can report them. Returns an empty list when the classifier has no
/// importances or `top_n` is zero.
pub fn top_features(model: &Model, feature_names: &[String], top_n: usize) -> Vec<FeatureImportance> {
    if top_n == 0 {
        return Vec::new();
    }

    let classifier = model.classifier();
    let Some(importances) = classifier.feature_importances() else {
        log::debug!("{} exposes no feature importances", classifier.name());
        return Vec::new();
    };

    let mut names = feature_names.to_vec();
    if let Some(pre) = model.preprocessor() {
        match pre.feature_names_out() {
            Ok(out) => names = out,
            Err(err) => log::debug!(
                "Preprocessor could not report output names, keeping supplied names: {}",
                err
            ),
        }
    }

    if names.len() != importances.len() {
        log::warn!(
            "{} feature names for {} importances; using placeholder names",
            names.len(),
            importances.len()
        );
        names = synthetic_names(importances.len());
    }

    let mut ranked: Vec<FeatureImportance> = names
        .into_iter()
        .zip(importances)
        .map(|(feature, importance)| FeatureImportance {
            feature,
            importance,
        })
        .collect();
    // NaN scores rank last.
    ranked.sort_by(|a, b| match (a.importance.is_nan(), b.importance.is_nan()) {
        (false, false) => b.importance.total_cmp(&a.importance),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    });
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictionError;
    use crate::models::forest::{DecisionTree, RandomForest, TreeNode};
    use crate::models::ClassifierModel;
    use crate::preprocessing::{ColumnStep, ColumnTransformer, OneHotEncoder, StandardScaler, Transformer};
    use ndarray::Array2;

    struct WithImportances(Option<Vec<f64>>);

    impl ClassifierModel for WithImportances {
        fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>, PredictionError> {
            Ok(vec![0.5; x.nrows()])
        }

        fn feature_importances(&self) -> Option<Vec<f64>> {
            self.0.clone()
        }
    }

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ranks_descending_and_truncates() {
        let model = Model::bare(WithImportances(Some(vec![0.1, 0.5, 0.4])));
        let top = top_features(&model, &names(&["age", "chol", "thalach"]), 2);
        assert_eq!(
            top,
            vec![
                FeatureImportance {
                    feature: "chol".to_string(),
                    importance: 0.5
                },
                FeatureImportance {
                    feature: "thalach".to_string(),
                    importance: 0.4
                },
            ]
        );
    }

    #[test]
    fn top_n_larger_than_available_returns_all() {
        let model = Model::bare(WithImportances(Some(vec![0.3, 0.7])));
        assert_eq!(top_features(&model, &names(&["a", "b"]), 10).len(), 2);
    }

    #[test]
    fn zero_top_n_and_missing_importances_are_empty() {
        let model = Model::bare(WithImportances(Some(vec![0.3, 0.7])));
        assert!(top_features(&model, &names(&["a", "b"]), 0).is_empty());

        let model = Model::bare(WithImportances(None));
        assert!(top_features(&model, &names(&["a", "b"]), 5).is_empty());
    }

    #[test]
    fn length_mismatch_uses_placeholder_names() {
        let model = Model::bare(WithImportances(Some(vec![0.05, 0.3, 0.1, 0.25, 0.3])));
        let top = top_features(&model, &names(&["a", "b", "c"]), 5);
        let labels: Vec<&str> = top.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(labels, vec!["Feature_1", "Feature_4", "Feature_3", "Feature_2", "Feature_0"]);
        assert!(top.windows(2).all(|w| w[0].importance >= w[1].importance));
    }

    #[test]
    fn nan_importance_ranks_last() {
        let model = Model::bare(WithImportances(Some(vec![0.2, f64::NAN, 0.5])));
        let top = top_features(&model, &names(&["a", "b", "c"]), 3);
        let labels: Vec<&str> = top.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(labels, vec!["c", "a", "b"]);
        assert!(top[2].importance.is_nan());
    }

    #[test]
    fn malformed_forest_yields_empty_ranking() {
        let forest = RandomForest {
            n_features: 1,
            feature_names_in: None,
            feature_importances: None,
            trees: vec![DecisionTree {
                nodes: vec![TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 5,
                    right: 6,
                    impurity: 0.5,
                    weighted_n_samples: 10.0,
                }],
            }],
        };
        assert!(top_features(&Model::bare(forest), &names(&["a"]), 3).is_empty());
    }

    fn preprocessor(categories: Vec<Vec<String>>) -> ColumnTransformer {
        ColumnTransformer::new(vec![
            ColumnStep {
                name: "num".to_string(),
                transformer: Transformer::StandardScaler(StandardScaler {
                    mean: vec![0.0],
                    scale: vec![1.0],
                }),
                columns: names(&["Age"]),
            },
            ColumnStep {
                name: "cat".to_string(),
                transformer: Transformer::OneHotEncoder(OneHotEncoder {
                    categories,
                    handle_unknown: Default::default(),
                }),
                columns: names(&["Diet"]),
            },
        ])
    }

    #[test]
    fn pipeline_prefers_transformed_names() {
        let pre = preprocessor(vec![names(&["Keto", "Vegan"])]);
        let model = Model::pipeline(Some(pre), WithImportances(Some(vec![0.2, 0.5, 0.3])));
        let top = top_features(&model, &names(&["Age", "Diet"]), 3);
        let labels: Vec<&str> = top.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(labels, vec!["cat__Diet_Keto", "cat__Diet_Vegan", "num__Age"]);
    }

    #[test]
    fn pipeline_keeps_supplied_names_when_preprocessor_fails() {
        // Two category lists for one column: the encoder cannot name its outputs.
        let pre = preprocessor(vec![names(&["Keto"]), names(&["Vegan"])]);
        let model = Model::pipeline(Some(pre), WithImportances(Some(vec![0.6, 0.4])));
        let top = top_features(&model, &names(&["Age", "Diet"]), 2);
        assert_eq!(top[0].feature, "Age");
        assert_eq!(top[1].feature, "Diet");
    }
}
