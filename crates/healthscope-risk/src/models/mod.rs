//! Loaded model shapes and the classifier backends behind them.
use std::fmt;

use ndarray::Array2;

use crate::error::PredictionError;
use crate::features::FeatureVector;
use crate::preprocessing::ColumnTransformer;

pub mod classifier_trait;
pub mod factory;
pub mod forest;
pub mod gbdt;
pub mod pipeline;

pub use classifier_trait::ClassifierModel;
pub use pipeline::Pipeline;

/// A trained model, resolved once at load time into one of two shapes.
pub enum Model {
    /// Expects columns in a caller-supplied order.
    Bare(Box<dyn ClassifierModel>),
    /// Accepts the raw, unordered feature vector.
    Pipeline(Pipeline),
}

impl Model {
    pub fn bare<C: ClassifierModel + 'static>(classifier: C) -> Self {
        Model::Bare(Box::new(classifier))
    }

    pub fn pipeline<C: ClassifierModel + 'static>(
        preprocessor: Option<ColumnTransformer>,
        classifier: C,
    ) -> Self {
        Model::Pipeline(Pipeline::new(preprocessor, Box::new(classifier)))
    }

    /// The classification stage.
    pub fn classifier(&self) -> &dyn ClassifierModel {
        match self {
            Model::Bare(classifier) => classifier.as_ref(),
            Model::Pipeline(pipeline) => pipeline.classifier(),
        }
    }

    pub fn preprocessor(&self) -> Option<&ColumnTransformer> {
        match self {
            Model::Bare(_) => None,
            Model::Pipeline(pipeline) => pipeline.preprocessor(),
        }
    }

    pub fn is_pipeline(&self) -> bool {
        matches!(self, Model::Pipeline(_))
    }

    /// Build the single-row input matrix for this model.
    ///
    /// Bare classifiers use `feature_names` when given and fall back to the
    /// names recorded at fit time. Pipelines ignore `feature_names`.
    pub fn prepare(
        &self,
        feature_names: Option<&[String]>,
        row: &FeatureVector,
    ) -> Result<Array2<f64>, PredictionError> {
        match self {
            Model::Bare(classifier) => {
                let names = feature_names
                    .or_else(|| classifier.feature_names_in())
                    .ok_or(PredictionError::MissingFeatureOrder)?;
                select_row(row, names)
            }
            Model::Pipeline(pipeline) => pipeline.prepare(row),
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Bare(classifier) => f.debug_tuple("Bare").field(&classifier.name()).finish(),
            Model::Pipeline(pipeline) => f.debug_tuple("Pipeline").field(pipeline).finish(),
        }
    }
}

/// Select `names` from `row`, in order, into a one-row matrix.
pub(crate) fn select_row(row: &FeatureVector, names: &[String]) -> Result<Array2<f64>, PredictionError> {
    let values = row.select_ordered(names)?;
    Array2::from_shape_vec((1, names.len()), values).map_err(|e| PredictionError::Other(e.to_string()))
}
