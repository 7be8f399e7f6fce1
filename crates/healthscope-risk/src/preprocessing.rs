//! Fitted preprocessing stages applied by pipeline models.
//!
//! A `ColumnTransformer` selects named input columns, runs each group through
//! its transformer (standard scaling, one-hot encoding or passthrough) and
//! concatenates the outputs in declaration order. Columns not named by any
//! step are dropped.
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::features::FeatureVector;

/// Per-column mean/scale standardization.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Minimum scale to avoid division by zero when transforming.
    const MIN_STD: f64 = 1e-6;

    fn check(&self, n_columns: usize) -> Result<(), PredictionError> {
        for len in [self.mean.len(), self.scale.len()] {
            if len != n_columns {
                return Err(PredictionError::ShapeMismatch {
                    expected: n_columns,
                    found: len,
                });
            }
        }
        Ok(())
    }

    fn transform_value(&self, idx: usize, value: f64) -> f64 {
        (value - self.mean[idx]) / self.scale[idx].max(Self::MIN_STD)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Unknown categories encode as all zeros.
    Ignore,
    #[default]
    Error,
}

/// One indicator column per known category, per input column.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OneHotEncoder {
    pub categories: Vec<Vec<String>>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    fn check(&self, n_columns: usize) -> Result<(), PredictionError> {
        if self.categories.len() != n_columns {
            return Err(PredictionError::ShapeMismatch {
                expected: n_columns,
                found: self.categories.len(),
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transformer {
    StandardScaler(StandardScaler),
    OneHotEncoder(OneHotEncoder),
    Passthrough,
}

/// A named transformer over a group of input columns.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ColumnStep {
    pub name: String,
    pub transformer: Transformer,
    pub columns: Vec<String>,
}

impl ColumnStep {
    fn check(&self) -> Result<(), PredictionError> {
        match &self.transformer {
            Transformer::StandardScaler(sc) => sc.check(self.columns.len()),
            Transformer::OneHotEncoder(enc) => enc.check(self.columns.len()),
            Transformer::Passthrough => Ok(()),
        }
    }

    fn output_names(&self, out: &mut Vec<String>) -> Result<(), PredictionError> {
        self.check()?;
        match &self.transformer {
            Transformer::OneHotEncoder(enc) => {
                for (column, categories) in self.columns.iter().zip(&enc.categories) {
                    for category in categories {
                        out.push(format!("{}__{}_{}", self.name, column, category));
                    }
                }
            }
            Transformer::StandardScaler(_) | Transformer::Passthrough => {
                for column in &self.columns {
                    out.push(format!("{}__{}", self.name, column));
                }
            }
        }
        Ok(())
    }

    fn transform_into(&self, row: &FeatureVector, out: &mut Vec<f64>) -> Result<(), PredictionError> {
        self.check()?;
        match &self.transformer {
            Transformer::StandardScaler(sc) => {
                for (idx, column) in self.columns.iter().enumerate() {
                    out.push(sc.transform_value(idx, row.require_f64(column)?));
                }
            }
            Transformer::OneHotEncoder(enc) => {
                for (column, categories) in self.columns.iter().zip(&enc.categories) {
                    let value = row.require(column)?.as_category();
                    let hit = categories.iter().position(|c| *c == value);
                    if hit.is_none() && enc.handle_unknown == HandleUnknown::Error {
                        return Err(PredictionError::InvalidFeatureValue {
                            feature: column.clone(),
                            value,
                        });
                    }
                    out.extend((0..categories.len()).map(|i| {
                        if Some(i) == hit {
                            1.0
                        } else {
                            0.0
                        }
                    }));
                }
            }
            Transformer::Passthrough => {
                for column in &self.columns {
                    out.push(row.require_f64(column)?);
                }
            }
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct ColumnTransformer {
    pub transformers: Vec<ColumnStep>,
}

impl ColumnTransformer {
    pub fn new(transformers: Vec<ColumnStep>) -> Self {
        Self { transformers }
    }

    /// Names of the output columns, prefixed with the owning step's name.
    pub fn feature_names_out(&self) -> Result<Vec<String>, PredictionError> {
        let mut names = Vec::new();
        for step in &self.transformers {
            step.output_names(&mut names)?;
        }
        Ok(names)
    }

    /// Transform a single input row.
    pub fn transform(&self, row: &FeatureVector) -> Result<Vec<f64>, PredictionError> {
        let mut out = Vec::new();
        for step in &self.transformers {
            step.transform_into(row, &mut out)?;
        }
        Ok(out)
    }

    /// Transform a single input row into a one-row matrix.
    pub fn transform_row(&self, row: &FeatureVector) -> Result<Array2<f64>, PredictionError> {
        let values = self.transform(row)?;
        let width = values.len();
        Array2::from_shape_vec((1, width), values).map_err(|e| PredictionError::Other(e.to_string()))
    }
}
