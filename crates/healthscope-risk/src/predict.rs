//! Single-row risk prediction.
//!
//! All entry points return a `PredictionResult` instead of an `Err`: failures
//! are logged and carried in the result so callers can render the message.
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::banding::{classify, RiskBand};
use crate::error::PredictionError;
use crate::features::FeatureVector;
use crate::models::Model;

/// A successful prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Predicted class, 0 or 1.
    pub prediction: u8,
    /// Probability of the positive class.
    pub probability: f64,
    #[serde(flatten)]
    pub band: RiskBand,
}

impl RiskAssessment {
    pub fn new(prediction: u8, probability: f64) -> Self {
        Self {
            prediction,
            probability,
            band: classify(probability),
        }
    }

    pub fn risk_level(&self) -> &'static str {
        self.band.label()
    }

    pub fn color(&self) -> &'static str {
        self.band.color()
    }

    pub fn recommendation(&self) -> &'static str {
        self.band.recommendation()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionResult {
    Success(RiskAssessment),
    Failure(PredictionError),
}

impl PredictionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResult::Success(_))
    }

    pub fn assessment(&self) -> Option<&RiskAssessment> {
        match self {
            PredictionResult::Success(assessment) => Some(assessment),
            PredictionResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PredictionError> {
        match self {
            PredictionResult::Success(_) => None,
            PredictionResult::Failure(err) => Some(err),
        }
    }
}

impl From<Result<RiskAssessment, PredictionError>> for PredictionResult {
    fn from(result: Result<RiskAssessment, PredictionError>) -> Self {
        match result {
            Ok(assessment) => PredictionResult::Success(assessment),
            Err(err) => PredictionResult::Failure(err),
        }
    }
}

/// Serialized flat: the assessment fields plus `success: true`, or
/// `success: false` with an `error` message.
impl Serialize for PredictionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PredictionResult::Success(a) => {
                let mut state = serializer.serialize_struct("PredictionResult", 6)?;
                state.serialize_field("prediction", &a.prediction)?;
                state.serialize_field("probability", &a.probability)?;
                state.serialize_field("risk_level", a.risk_level())?;
                state.serialize_field("color", a.color())?;
                state.serialize_field("recommendation", a.recommendation())?;
                state.serialize_field("success", &true)?;
                state.end()
            }
            PredictionResult::Failure(err) => {
                let mut state = serializer.serialize_struct("PredictionResult", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &err.to_string())?;
                state.end()
            }
        }
    }
}

fn single<T: Copy>(values: &[T], what: &str) -> Result<T, PredictionError> {
    match values {
        [value] => Ok(*value),
        _ => Err(PredictionError::Model(format!(
            "expected one {} for a single row, got {}",
            what,
            values.len()
        ))),
    }
}

fn assess(
    model: &Model,
    feature_names: Option<&[String]>,
    input: &FeatureVector,
) -> Result<RiskAssessment, PredictionError> {
    let x = model.prepare(feature_names, input)?;
    let classifier = model.classifier();

    let prediction = single(&classifier.predict(&x)?, "class label")?;
    if prediction > 1 {
        return Err(PredictionError::Model(format!(
            "class label {} is not binary",
            prediction
        )));
    }

    let probability = single(&classifier.predict_proba(&x)?, "probability")?;
    if !probability.is_finite() {
        return Err(PredictionError::Model(format!(
            "probability {} is not finite",
            probability
        )));
    }

    Ok(RiskAssessment::new(prediction, probability))
}

/// Predict with either model shape. `feature_names` orders the columns for
/// bare classifiers and is ignored by pipelines.
pub fn predict(
    model: &Model,
    feature_names: Option<&[String]>,
    input: &FeatureVector,
) -> PredictionResult {
    let result = assess(model, feature_names, input);
    match &result {
        Ok(a) => log::debug!(
            "{} predicted class {} with p = {:.3} ({})",
            model.classifier().name(),
            a.prediction,
            a.probability,
            a.band
        ),
        Err(err) => log::warn!("Prediction failed: {}", err),
    }
    result.into()
}

/// Predict with a classifier that expects columns in `feature_names` order.
pub fn predict_ordered(model: &Model, feature_names: &[String], input: &FeatureVector) -> PredictionResult {
    predict(model, Some(feature_names), input)
}

/// Predict with a pipeline that selects and encodes its own columns.
pub fn predict_pipeline(model: &Model, input: &FeatureVector) -> PredictionResult {
    predict(model, None, input)
}
