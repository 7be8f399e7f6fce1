pub mod importance;
pub mod predict;
pub mod summary;

use std::path::Path;

use anyhow::Result;

use healthscope_risk::config::{load_service_config, ServiceConfig};

/// Load the service config from `path`, or fall back to the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    match path {
        Some(path) => {
            log::info!("[HealthScope] Using config: {:?}", path);
            load_service_config(path)
        }
        None => {
            log::info!("[HealthScope] No config provided; using defaults.");
            Ok(ServiceConfig::default())
        }
    }
}
