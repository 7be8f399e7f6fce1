//! `healthscope predict`: score one patient record.
use std::path::Path;

use anyhow::{Context, Result};

use healthscope_risk::config::{Domain, ServiceConfig};
use healthscope_risk::{FeatureVector, ModelRegistry, PredictionResult};

/// Read a patient record stored as a JSON object of feature values.
pub fn read_input<P: AsRef<Path>>(path: P) -> Result<FeatureVector> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input: {}", path.display()))?;
    let input: FeatureVector = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse input: {}", path.display()))?;
    Ok(input)
}

/// Load the domain's model and predict. Only input errors are returned as
/// `Err`; prediction failures come back inside the result.
pub fn run_predict<P: AsRef<Path>>(
    config: &ServiceConfig,
    domain: Domain,
    input_path: P,
) -> Result<PredictionResult> {
    let input = read_input(input_path)?;
    let registry = ModelRegistry::load_domains(config, &[domain]);
    Ok(registry.predict(domain, &input))
}
