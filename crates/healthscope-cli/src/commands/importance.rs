//! `healthscope importance`: rank a domain's features.
use anyhow::Result;

use healthscope_risk::config::{Domain, ServiceConfig};
use healthscope_risk::{FeatureImportance, ModelRegistry};

/// Ranked importances for `domain`; `top_n` defaults to the configured value.
///
/// An unavailable model yields an empty list.
pub fn run_importance(
    config: &ServiceConfig,
    domain: Domain,
    top_n: Option<usize>,
) -> Result<Vec<FeatureImportance>> {
    let registry = ModelRegistry::load_domains(config, &[domain]);
    let top_n = top_n.unwrap_or_else(|| registry.default_top_n());
    Ok(registry.top_features(domain, top_n))
}
