//! Named feature values supplied by a caller for a single prediction.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PredictionError;

/// A scalar input value, numeric or categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FeatureValue {
    /// Numeric view of the value. Text is accepted when it parses as a number
    /// (form fields often arrive as strings); booleans map to 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FeatureValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Canonical text used to match one-hot categories. Integral numbers drop
    /// their fractional part so `1.0` matches the category `"1"`.
    pub fn as_category(&self) -> String {
        match self {
            FeatureValue::Text(s) => s.clone(),
            FeatureValue::Bool(b) => b.to_string(),
            FeatureValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                format!("{}", *v as i64)
            }
            FeatureValue::Number(v) => v.to_string(),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Number(v)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Number(v as f64)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}

/// Mapping from feature name to value. Extra keys are ignored by the models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, V>(&mut self, name: K, value: V) -> Option<FeatureValue>
    where
        K: Into<String>,
        V: Into<FeatureValue>,
    {
        self.values.insert(name.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FeatureValue>,
    {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    /// Look up a value, failing with `MissingFeature` when absent.
    pub fn require(&self, name: &str) -> Result<&FeatureValue, PredictionError> {
        self.values
            .get(name)
            .ok_or_else(|| PredictionError::MissingFeature(name.to_string()))
    }

    /// Look up a numeric value.
    pub fn require_f64(&self, name: &str) -> Result<f64, PredictionError> {
        let value = self.require(name)?;
        value
            .as_f64()
            .ok_or_else(|| PredictionError::InvalidFeatureValue {
                feature: name.to_string(),
                value: value.as_category(),
            })
    }

    /// Select numeric values in exactly the given column order.
    pub fn select_ordered<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<f64>, PredictionError> {
        names.iter().map(|n| self.require_f64(n.as_ref())).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureValue)> {
        self.values.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for FeatureVector
where
    K: Into<String>,
    V: Into<FeatureValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vector = FeatureVector::new();
        for (k, v) in iter {
            vector.insert(k, v);
        }
        vector
    }
}
