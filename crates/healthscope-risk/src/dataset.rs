//! Tabular datasets and the summary statistics shown alongside them.
//!
//! Values are kept as text and typed per column: a column is numeric when
//! every present value parses as a number. Missing markers follow the usual
//! CSV conventions (`NA`, `NaN`, empty cell, ...).
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::features::FeatureValue;

/// Cell contents treated as missing.
pub const NA_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<String>>,
    pub kind: ColumnKind,
}

impl Column {
    fn new(name: String, values: Vec<Option<String>>) -> Self {
        let numeric = values
            .iter()
            .flatten()
            .all(|v| v.parse::<f64>().is_ok());
        let kind = if numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        };
        Self { name, values, kind }
    }

    pub fn missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Parsed values for numeric columns, `None` for categorical ones.
    pub fn numeric_values(&self) -> Option<Vec<Option<f64>>> {
        if self.kind != ColumnKind::Numeric {
            return None;
        }
        Some(
            self.values
                .iter()
                .map(|v| v.as_ref().and_then(|s| s.parse::<f64>().ok()))
                .collect(),
        )
    }

    /// Key used when counting values; numbers are canonicalized so `1` and
    /// `1.0` count together.
    fn count_key(&self, raw: &str) -> String {
        match (self.kind, raw.parse::<f64>()) {
            (ColumnKind::Numeric, Ok(v)) => FeatureValue::Number(v).as_category(),
            _ => raw.to_string(),
        }
    }
}

/// Headline counts for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub missing: usize,
    /// Missing cells as a percentage of all cells, two decimals.
    pub missing_pct: f64,
    pub numeric_columns: usize,
    pub categorical_columns: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a CSV file with a header row.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open dataset: {}", path.as_ref().display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to read dataset: {}", path.as_ref().display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .context("Failed to read header row")?
            .clone();
        let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

        let mut n_rows = 0;
        for (row_idx, result) in reader.records().enumerate() {
            let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
            for (col, cell) in record.iter().enumerate() {
                let cell = if NA_VALUES.contains(&cell) {
                    None
                } else {
                    Some(cell.to_string())
                };
                values[col].push(cell);
            }
            n_rows += 1;
        }

        let columns = headers
            .iter()
            .zip(values)
            .map(|(name, values)| Column::new(name.to_string(), values))
            .collect();
        log::debug!("Read dataset with {} rows", n_rows);
        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn summary(&self) -> DatasetSummary {
        let missing: usize = self.columns.iter().map(Column::missing).sum();
        let cells = (self.n_rows * self.columns.len()).max(1);
        let numeric_columns = self
            .columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .count();
        DatasetSummary {
            rows: self.n_rows,
            columns: self.columns.len(),
            missing,
            missing_pct: round_to(missing as f64 / cells as f64 * 100.0, 2),
            numeric_columns,
            categorical_columns: self.columns.len() - numeric_columns,
        }
    }

    /// Mean of the present values of a numeric column.
    pub fn column_mean(&self, name: &str) -> Option<f64> {
        let values: Vec<f64> = self.column(name)?.numeric_values()?.into_iter().flatten().collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().mean())
    }

    /// Counts of each present value, most frequent first. Ties keep the
    /// order in which values first appear.
    pub fn value_counts(&self, name: &str) -> Vec<(String, usize)> {
        let Some(column) = self.column(name) else {
            return Vec::new();
        };
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for raw in column.values.iter().flatten() {
            let key = column.count_key(raw);
            let count = counts.entry(key.clone()).or_insert(0);
            if *count == 0 {
                order.push(key);
            }
            *count += 1;
        }
        let mut ranked: Vec<(String, usize)> = order
            .into_iter()
            .map(|k| {
                let n = counts[&k];
                (k, n)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Share of all rows holding `value` in `name`, as a percentage.
    pub fn percentage(&self, name: &str, value: &str) -> f64 {
        if self.n_rows == 0 {
            return 0.0;
        }
        let Some(column) = self.column(name) else {
            return 0.0;
        };
        let key = column.count_key(value);
        let hits = self
            .value_counts(name)
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, n)| n)
            .unwrap_or(0);
        hits as f64 / self.n_rows as f64 * 100.0
    }

    /// Pearson correlation between every pair of numeric columns, using the
    /// rows where both values are present. Undefined pairs are NaN.
    pub fn correlation_matrix(&self) -> (Vec<String>, Array2<f64>) {
        let numeric: Vec<(&str, Vec<Option<f64>>)> = self
            .columns
            .iter()
            .filter_map(|c| c.numeric_values().map(|v| (c.name.as_str(), v)))
            .collect();
        let n = numeric.len();
        let mut corr = Array2::from_elem((n, n), f64::NAN);

        for i in 0..n {
            for j in i..n {
                let (xs, ys): (Vec<f64>, Vec<f64>) = numeric[i]
                    .1
                    .iter()
                    .zip(&numeric[j].1)
                    .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                    .unzip();
                let r = pearson(&xs, &ys);
                corr[(i, j)] = r;
                corr[(j, i)] = r;
            }
        }

        let names = numeric.into_iter().map(|(name, _)| name.to_string()).collect();
        (names, corr)
    }
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    let sx = xs.iter().std_dev();
    let sy = ys.iter().std_dev();
    if sx == 0.0 || sy == 0.0 {
        return f64::NAN;
    }
    xs.iter().covariance(ys.iter()) / (sx * sy)
}
