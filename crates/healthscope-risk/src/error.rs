use std::error::Error;
use std::fmt;

/// Reasons a prediction could not be produced.
///
/// These are carried inside a failed `PredictionResult` rather than returned
/// to the caller as an `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// A column the model needs is absent from the input.
    MissingFeature(String),
    /// A value could not be converted to the type the model expects.
    InvalidFeatureValue { feature: String, value: String },
    /// No model is loaded for the requested domain.
    ModelUnavailable(String),
    /// Input width disagrees with what the model or a transformer was fitted on.
    ShapeMismatch { expected: usize, found: usize },
    /// Neither the caller nor the model knows which column order to use.
    MissingFeatureOrder,
    /// Failure raised by the classifier backend itself.
    Model(String),
    /// Anything else, such as a matrix that could not be assembled.
    Other(String),
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PredictionError::MissingFeature(name) => {
                write!(f, "Missing required feature '{}'", name)
            }
            PredictionError::InvalidFeatureValue { feature, value } => {
                write!(f, "Invalid value '{}' for feature '{}'", value, feature)
            }
            PredictionError::ModelUnavailable(domain) => {
                write!(f, "No {} model is loaded; prediction is not possible", domain)
            }
            PredictionError::ShapeMismatch { expected, found } => write!(
                f,
                "Shape mismatch: expected {} values, found {}",
                expected, found
            ),
            PredictionError::MissingFeatureOrder => {
                write!(f, "No feature order available for this model")
            }
            PredictionError::Model(msg) => write!(f, "Model error: {}", msg),
            PredictionError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for PredictionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_feature() {
        let err = PredictionError::MissingFeature("chol".to_string());
        assert_eq!(err.to_string(), "Missing required feature 'chol'");

        let err = PredictionError::InvalidFeatureValue {
            feature: "age".to_string(),
            value: "old".to_string(),
        };
        assert!(err.to_string().contains("age"));
        assert!(err.to_string().contains("old"));
    }
}
