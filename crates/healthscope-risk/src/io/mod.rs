//! IO utilities for model artifacts.

pub mod model_artifact;

pub use model_artifact::{
    load_feature_names, load_model, read_model_artifact, write_model_artifact, ModelArtifact,
};
