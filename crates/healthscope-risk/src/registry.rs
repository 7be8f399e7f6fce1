//! Application state holding the models loaded at startup.
//!
//! Models are loaded once and shared read-only; a domain whose artifacts
//! failed to load is simply absent, and requests against it fail with
//! `ModelUnavailable`.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::config::{Domain, ServiceConfig};
use crate::error::PredictionError;
use crate::features::FeatureVector;
use crate::importance::{top_features, FeatureImportance};
use crate::io::model_artifact::{load_feature_names, load_model};
use crate::models::Model;
use crate::predict::{predict, PredictionResult};

/// A model together with the column order it expects, when it needs one.
#[derive(Debug)]
pub struct LoadedModel {
    pub model: Model,
    pub feature_names: Option<Vec<String>>,
}

impl LoadedModel {
    pub fn new(model: Model, feature_names: Option<Vec<String>>) -> Self {
        Self {
            model,
            feature_names,
        }
    }

    pub fn predict(&self, input: &FeatureVector) -> PredictionResult {
        predict(&self.model, self.feature_names.as_deref(), input)
    }

    pub fn top_features(&self, top_n: usize) -> Vec<FeatureImportance> {
        let names = self.feature_names.as_deref().unwrap_or(&[]);
        top_features(&self.model, names, top_n)
    }
}

#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: HashMap<Domain, Arc<LoadedModel>>,
    top_n: usize,
}

impl ModelRegistry {
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
            top_n: ServiceConfig::default().top_n,
        }
    }

    /// Load every configured domain. Failures are logged and leave the
    /// domain unavailable; this never fails as a whole.
    pub fn load(config: &ServiceConfig) -> Self {
        Self::load_domains(config, &Domain::ALL)
    }

    /// Like `load`, restricted to `domains`.
    pub fn load_domains(config: &ServiceConfig, domains: &[Domain]) -> Self {
        let mut registry = Self {
            models: HashMap::new(),
            top_n: config.top_n,
        };
        for &domain in domains {
            match load_domain(config, domain) {
                Ok(loaded) => {
                    log::info!("Loaded {} model ({:?})", domain, loaded.model);
                    registry.insert(domain, loaded);
                }
                Err(e) => log::error!("Error loading {} model: {:#}", domain, e),
            }
        }
        registry
    }

    pub fn insert(&mut self, domain: Domain, loaded: LoadedModel) {
        self.models.insert(domain, Arc::new(loaded));
    }

    pub fn with_model(mut self, domain: Domain, loaded: LoadedModel) -> Self {
        self.insert(domain, loaded);
        self
    }

    pub fn get(&self, domain: Domain) -> Option<Arc<LoadedModel>> {
        self.models.get(&domain).cloned()
    }

    pub fn is_available(&self, domain: Domain) -> bool {
        self.models.contains_key(&domain)
    }

    /// Configured default for `top_features`.
    pub fn default_top_n(&self) -> usize {
        self.top_n
    }

    pub fn predict(&self, domain: Domain, input: &FeatureVector) -> PredictionResult {
        match self.models.get(&domain) {
            Some(loaded) => loaded.predict(input),
            None => {
                log::warn!("Prediction requested for unavailable {} model", domain);
                PredictionResult::Failure(PredictionError::ModelUnavailable(domain.to_string()))
            }
        }
    }

    /// Empty when the domain has no model loaded.
    pub fn top_features(&self, domain: Domain, top_n: usize) -> Vec<FeatureImportance> {
        self.models
            .get(&domain)
            .map(|loaded| loaded.top_features(top_n))
            .unwrap_or_default()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

fn load_domain(config: &ServiceConfig, domain: Domain) -> Result<LoadedModel> {
    let source = config.source(domain);
    let model = load_model(config.resolve(&source.model))?;

    let feature_names = match &source.features {
        Some(path) => match load_feature_names(config.resolve(path)) {
            Ok(names) => Some(names),
            Err(e) if domain.requires_feature_names() => return Err(e),
            Err(e) => {
                log::debug!("No {} feature list: {:#}", domain, e);
                None
            }
        },
        None => None,
    };

    if domain.requires_feature_names() && feature_names.is_none() {
        return Err(anyhow!("{} model requires a feature list", domain));
    }
    Ok(LoadedModel::new(model, feature_names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_short_circuits() {
        let registry = ModelRegistry::empty();
        let result = registry.predict(Domain::Heart, &FeatureVector::new());
        assert_eq!(
            result,
            PredictionResult::Failure(PredictionError::ModelUnavailable("heart".to_string()))
        );
        assert!(registry.top_features(Domain::Heart, 5).is_empty());
        assert_eq!(registry.default_top_n(), 10);
    }

    #[test]
    fn load_with_missing_files_leaves_domains_absent() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig {
            model_dir: dir.path().to_path_buf(),
            ..ServiceConfig::default()
        };
        let registry = ModelRegistry::load(&config);
        for domain in Domain::ALL {
            assert!(!registry.is_available(domain));
        }
    }
}
