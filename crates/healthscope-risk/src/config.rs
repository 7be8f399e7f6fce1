use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};

/// The medical domains a model can be loaded for.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Heart,
    Diabetes,
    Pcos,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Heart, Domain::Diabetes, Domain::Pcos];

    /// Bare classifiers need the caller to supply column order; the PCOS
    /// pipeline selects its own columns.
    pub fn requires_feature_names(&self) -> bool {
        !matches!(self, Domain::Pcos)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Heart => "heart",
            Domain::Diabetes => "diabetes",
            Domain::Pcos => "pcos",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heart" | "heart_disease" => Ok(Domain::Heart),
            "diabetes" => Ok(Domain::Diabetes),
            "pcos" => Ok(Domain::Pcos),
            _ => Err(format!(
                "Unknown domain: {}. Expected one of: heart, diabetes, pcos",
                s
            )),
        }
    }
}

/// Where a domain's model artifact and feature list live, relative to
/// `ServiceConfig::model_dir` unless absolute.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelSource {
    pub model: PathBuf,
    #[serde(default)]
    pub features: Option<PathBuf>,
}

impl ModelSource {
    fn for_domain(domain: Domain) -> Self {
        let stem = domain.as_str();
        Self {
            model: PathBuf::from(format!("{}_model.json", stem)),
            features: Some(PathBuf::from(format!("{}_features.json", stem))),
        }
    }
}

/// Service-wide configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub model_dir: PathBuf,
    pub heart: ModelSource,
    pub diabetes: ModelSource,
    pub pcos: ModelSource,
    /// Default number of importance entries to report.
    pub top_n: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            heart: ModelSource::for_domain(Domain::Heart),
            diabetes: ModelSource::for_domain(Domain::Diabetes),
            pcos: ModelSource::for_domain(Domain::Pcos),
            top_n: 10,
        }
    }
}

impl ServiceConfig {
    pub fn source(&self, domain: Domain) -> &ModelSource {
        match domain {
            Domain::Heart => &self.heart,
            Domain::Diabetes => &self.diabetes,
            Domain::Pcos => &self.pcos,
        }
    }

    /// Resolve a configured path against `model_dir`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.model_dir.join(path)
        }
    }
}

/// Load a service configuration from a JSON file.
pub fn load_service_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: ServiceConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_from_str_is_case_insensitive() {
        assert_eq!("Heart".parse::<Domain>(), Ok(Domain::Heart));
        assert_eq!("PCOS".parse::<Domain>(), Ok(Domain::Pcos));
        assert!("kidney".parse::<Domain>().is_err());
    }

    #[test]
    fn only_pcos_skips_feature_names() {
        assert!(Domain::Heart.requires_feature_names());
        assert!(Domain::Diabetes.requires_feature_names());
        assert!(!Domain::Pcos.requires_feature_names());
    }

    #[test]
    fn default_layout_matches_artifact_names() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.top_n, 10);
        assert_eq!(
            cfg.resolve(&cfg.heart.model),
            PathBuf::from("models/heart_model.json")
        );
        assert_eq!(
            cfg.source(Domain::Pcos).features,
            Some(PathBuf::from("pcos_features.json"))
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ServiceConfig = serde_json::from_str(r#"{"model_dir": "/srv/models", "top_n": 5}"#).unwrap();
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.diabetes, ModelSource::for_domain(Domain::Diabetes));
        assert_eq!(
            cfg.resolve(&cfg.diabetes.model),
            PathBuf::from("/srv/models/diabetes_model.json")
        );
    }
}
