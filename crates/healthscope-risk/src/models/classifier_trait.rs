use ndarray::Array2;

use crate::error::PredictionError;

/// Contract shared by every fitted binary classifier the service can load.
///
/// Rows are samples and columns are features in the order the model was
/// trained on. Implementations are immutable once loaded so they can be shared
/// across request handlers.
pub trait ClassifierModel: Send + Sync {
    /// Probability of the positive class for each row.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>, PredictionError>;

    /// Class label (0 or 1) for each row. Defaults to the argmax of
    /// `predict_proba`, so ties go to the negative class.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<u8>, PredictionError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| u8::from(p > 0.5))
            .collect())
    }

    /// Per-feature importance scores, when the model type has them.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }

    /// Column names recorded when the model was fitted.
    fn feature_names_in(&self) -> Option<&[String]> {
        None
    }

    /// Number of input columns the model expects, when known.
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Fail with `ShapeMismatch` unless `x` has the expected column count.
pub(crate) fn check_width(model: &dyn ClassifierModel, x: &Array2<f64>) -> Result<(), PredictionError> {
    match model.n_features() {
        Some(expected) if expected != x.ncols() => Err(PredictionError::ShapeMismatch {
            expected,
            found: x.ncols(),
        }),
        _ => Ok(()),
    }
}
