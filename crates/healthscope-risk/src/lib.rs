//! healthscope-risk: risk prediction helpers for tabular medical classifiers.
//!
//! This crate loads previously trained classifiers (random forests, gradient
//! boosted trees, and preprocessing pipelines wrapping either), turns a named
//! set of feature values into a banded risk assessment, and ranks feature
//! importances. Dataset summary statistics used by the dashboards live in
//! `dataset`.
//!
//! Prediction and importance extraction never fail loudly: prediction returns
//! a tagged `PredictionResult` and importance extraction returns an empty list
//! when nothing can be reported.
pub mod banding;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod importance;
pub mod io;
pub mod models;
pub mod predict;
pub mod preprocessing;
pub mod registry;

pub use banding::{classify, RiskBand};
pub use config::{Domain, ServiceConfig};
pub use error::PredictionError;
pub use features::{FeatureValue, FeatureVector};
pub use importance::{top_features, FeatureImportance};
pub use models::Model;
pub use predict::{predict, predict_ordered, predict_pipeline, PredictionResult, RiskAssessment};
pub use registry::{LoadedModel, ModelRegistry};
