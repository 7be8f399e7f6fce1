use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::io::model_artifact::ModelArtifact;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::gbdt::GbdtClassifier;
use crate::models::{Model, Pipeline};

/// Build a loaded `Model` from a parsed artifact. Relative backend paths are
/// resolved against `base_dir`.
pub fn build_model(artifact: ModelArtifact, base_dir: &Path) -> Result<Model> {
    match artifact {
        ModelArtifact::Pipeline {
            preprocessor,
            classifier,
        } => {
            let classifier = build_classifier(*classifier, base_dir)
                .context("Failed to build pipeline classifier stage")?;
            Ok(Model::Pipeline(Pipeline::new(preprocessor, classifier)))
        }
        other => Ok(Model::Bare(build_classifier(other, base_dir)?)),
    }
}

fn build_classifier(artifact: ModelArtifact, base_dir: &Path) -> Result<Box<dyn ClassifierModel>> {
    match artifact {
        ModelArtifact::RandomForest(forest) => {
            forest.validate().context("Invalid random forest artifact")?;
            log::debug!(
                "Built random forest with {} trees over {} features",
                forest.trees.len(),
                forest.n_features
            );
            Ok(Box::new(forest))
        }
        ModelArtifact::Gbdt {
            model_path,
            n_features,
        } => {
            let path = if model_path.is_absolute() {
                model_path
            } else {
                base_dir.join(model_path)
            };
            Ok(Box::new(GbdtClassifier::load(&path, n_features)?))
        }
        ModelArtifact::Pipeline { .. } => bail!("Nested pipelines are not supported"),
    }
}
