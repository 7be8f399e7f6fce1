//! JSON model artifacts and feature-name lists.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::factory::build_model;
use crate::models::forest::RandomForest;
use crate::models::Model;
use crate::preprocessing::ColumnTransformer;

/// On-disk description of a trained model, tagged by `kind`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    /// A `gbdt` model file written by `GBDT::save_model`.
    Gbdt { model_path: PathBuf, n_features: usize },
    Pipeline {
        #[serde(default)]
        preprocessor: Option<ColumnTransformer>,
        classifier: Box<ModelArtifact>,
    },
}

/// Parse a model artifact without building it.
pub fn read_model_artifact<P: AsRef<Path>>(path: P) -> Result<ModelArtifact> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model artifact: {}", path.display()))?;
    let artifact = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse model artifact: {}", path.display()))?;
    Ok(artifact)
}

/// Write a model artifact as pretty JSON.
pub fn write_model_artifact<P: AsRef<Path>>(artifact: &ModelArtifact, path: P) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(artifact)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write model artifact: {}", path.display()))?;
    Ok(())
}

/// Load and build a model. Backend files referenced by the artifact are
/// resolved relative to the artifact's directory.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Model> {
    let path = path.as_ref();
    let artifact = read_model_artifact(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    build_model(artifact, base_dir)
        .with_context(|| format!("Failed to build model from {}", path.display()))
}

/// Load an ordered feature-name list stored as a JSON array of strings.
pub fn load_feature_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feature list: {}", path.display()))?;
    let names: Vec<String> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse feature list: {}", path.display()))?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_error_with_path() {
        let err = load_model("/nonexistent/heart_model.json").unwrap_err();
        assert!(format!("{:#}", err).contains("heart_model.json"));
        assert!(load_feature_names("/nonexistent/heart_features.json").is_err());
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, r#"{"kind": "svm"}"#).unwrap();
        let err = read_model_artifact(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }
}
