//! `healthscope summary`: dataset overview statistics.
use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use healthscope_risk::dataset::{Dataset, DatasetSummary};

#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    #[serde(flatten)]
    pub summary: DatasetSummary,
    /// Means of the numeric columns that have at least one value.
    pub column_means: BTreeMap<String, f64>,
}

impl DatasetReport {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let column_means = dataset
            .column_names()
            .into_iter()
            .filter_map(|name| dataset.column_mean(name).map(|m| (name.to_string(), m)))
            .collect();
        Self {
            summary: dataset.summary(),
            column_means,
        }
    }
}

/// Summaries keyed by the path they were read from.
pub fn run_summary(paths: &[PathBuf]) -> Result<BTreeMap<String, DatasetReport>> {
    let mut reports = BTreeMap::new();
    for path in paths {
        let dataset = Dataset::from_csv(path)?;
        log::info!(
            "[HealthScope] {:?}: {} rows, {} columns",
            path,
            dataset.n_rows(),
            dataset.n_columns()
        );
        reports.insert(path.display().to_string(), DatasetReport::from_dataset(&dataset));
    }
    Ok(reports)
}
