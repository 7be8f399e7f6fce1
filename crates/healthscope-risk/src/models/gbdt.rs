use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use anyhow::{anyhow, Result};
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::Array2;

use crate::error::PredictionError;
use crate::models::classifier_trait::{check_width, ClassifierModel};

/// Gradient Boosting Decision Tree (GBDT) classifier trained with the
/// `LogLikelyhood` loss and saved with `GBDT::save_model`.
pub struct GbdtClassifier {
    model: GBDT,
    n_features: usize,
}

impl GbdtClassifier {
    pub fn new(model: GBDT, n_features: usize) -> Self {
        GbdtClassifier { model, n_features }
    }

    /// Load a model written by `GBDT::save_model`.
    pub fn load<P: AsRef<Path>>(path: P, n_features: usize) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .to_str()
            .ok_or_else(|| anyhow!("GBDT model path is not valid UTF-8: {}", path.display()))?;
        let model = GBDT::load_model(file_name)
            .map_err(|e| anyhow!("Failed to load GBDT model {}: {}", path.display(), e))?;
        Ok(Self::new(model, n_features))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "gbdt prediction panicked".to_string()
    }
}

impl ClassifierModel for GbdtClassifier {
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>, PredictionError> {
        check_width(self, x)?;

        let mut test_x = DataVec::new();
        for row in x.outer_iter() {
            let test_row: Vec<f32> = row.iter().map(|&v| v as f32).collect();
            test_x.push(Data::new_training_data(test_row, 1.0, 0.0, None));
        }

        // The backend asserts on malformed input instead of returning errors.
        let predictions = panic::catch_unwind(AssertUnwindSafe(|| self.model.predict(&test_x)))
            .map_err(|payload| PredictionError::Model(panic_message(payload)))?;

        Ok(predictions
            .into_iter()
            .map(|p| (p as f64).clamp(0.0, 1.0))
            .collect())
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gbdt::config::Config;

    fn fitted() -> GBDT {
        let rows: Vec<(Vec<f32>, f32)> = vec![
            (vec![1.0, 0.0], 1.0),
            (vec![0.0, 1.0], -1.0),
            (vec![1.0, 0.1], 1.0),
            (vec![0.0, 0.9], -1.0),
            (vec![1.1, 0.0], 1.0),
            (vec![0.0, 1.2], -1.0),
        ];

        let mut config = Config::new();
        config.set_feature_size(2);
        config.set_shrinkage(0.1);
        config.set_max_depth(3);
        config.set_iterations(5);
        config.set_debug(false);
        config.set_training_optimization_level(2);
        config.set_loss("LogLikelyhood");

        let mut gbdt = GBDT::new(&config);
        let mut train_x = DataVec::new();
        for (features, label) in rows {
            train_x.push(Data::new_training_data(features, 1.0, label, None));
        }
        gbdt.fit(&mut train_x);
        gbdt
    }

    #[test]
    fn probabilities_stay_in_unit_interval() {
        let classifier = GbdtClassifier::new(fitted(), 2);
        let x = Array2::from_shape_vec((2, 2), vec![1.0, 0.0, 0.0, 1.0]).unwrap();

        let proba = classifier.predict_proba(&x).unwrap();
        assert_eq!(proba.len(), 2);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));

        let labels = classifier.predict(&x).unwrap();
        assert!(labels.iter().all(|&l| l <= 1));
        assert_eq!(classifier.feature_importances(), None);
    }

    #[test]
    fn width_mismatch_is_reported() {
        let classifier = GbdtClassifier::new(fitted(), 2);
        let x = Array2::from_shape_vec((1, 3), vec![1.0, 0.0, 0.0]).unwrap();
        assert_eq!(
            classifier.predict_proba(&x),
            Err(PredictionError::ShapeMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn loads_saved_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heart.gbdt");
        fitted().save_model(path.to_str().unwrap()).unwrap();

        let classifier = GbdtClassifier::load(&path, 2).unwrap();
        let x = Array2::from_shape_vec((1, 2), vec![1.0, 0.0]).unwrap();
        assert_eq!(classifier.predict_proba(&x).unwrap().len(), 1);
    }

    #[test]
    fn missing_model_file_errors() {
        assert!(GbdtClassifier::load("/nonexistent/heart.gbdt", 2).is_err());
    }
}
