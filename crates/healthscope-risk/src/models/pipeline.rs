use std::fmt;

use ndarray::Array2;

use crate::error::PredictionError;
use crate::features::FeatureVector;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::select_row;
use crate::preprocessing::ColumnTransformer;

/// A classifier bundled with the preprocessing it was trained behind.
///
/// The pipeline owns column selection: callers hand it the raw feature
/// vector and never supply an order.
pub struct Pipeline {
    preprocessor: Option<ColumnTransformer>,
    classifier: Box<dyn ClassifierModel>,
}

impl Pipeline {
    pub fn new(preprocessor: Option<ColumnTransformer>, classifier: Box<dyn ClassifierModel>) -> Self {
        Self {
            preprocessor,
            classifier,
        }
    }

    pub fn preprocessor(&self) -> Option<&ColumnTransformer> {
        self.preprocessor.as_ref()
    }

    pub fn classifier(&self) -> &dyn ClassifierModel {
        self.classifier.as_ref()
    }

    /// Turn a raw row into the classifier's input matrix. Without a
    /// preprocessor the classifier's recorded input columns are selected.
    pub fn prepare(&self, row: &FeatureVector) -> Result<Array2<f64>, PredictionError> {
        match &self.preprocessor {
            Some(pre) => pre.transform_row(row),
            None => {
                let names = self
                    .classifier
                    .feature_names_in()
                    .ok_or(PredictionError::MissingFeatureOrder)?;
                select_row(row, names)
            }
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("preprocessor", &self.preprocessor)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}
