//! Model statistics and the plain-text model report.
//!
//! The report is a nine-line, tab-separated text file:
//!
//! ```text
//! {name}
//! Model Score (R^2) = {score}
//! Test Split:{fraction}\t{param}:{value}...
//! Test Samples \t{labels}
//! Test Samples Predicted Values \t{predictions}
//! Test Samples Actual Values \t{outcomes}
//! Training Samples \t{labels}
//! Training Samples Actual Values \t{outcomes}
//! Regression Sites \t{kept site labels}
//! ```
//!
//! Empty partitions give empty fields, never missing lines.

use std::fmt::Display;
use std::path::Path;

use ndarray::Array1;

use crate::config::{SiteBinding, ZeroTolerance};
use crate::dataset::Partition;
use crate::error::Result;
use crate::model::InferenceModel;

/// Evaluation of a fitted model on the Test partition.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelStats {
    /// Site labels whose coefficient is not zero, in column order.
    pub regression_sites: Vec<String>,
    /// R² on the Test partition.
    pub score: f64,
    /// Predictions for every Test row, in row order.
    pub predicted: Array1<f64>,
}

impl ModelStats {
    pub fn evaluate<M: InferenceModel>(
        model: &M,
        sites: &[SiteBinding],
        tolerance: ZeroTolerance,
        test: &Partition,
    ) -> Self {
        let coefficients = model.coefficients();
        let regression_sites = sites
            .iter()
            .filter(|site| !tolerance.is_close_to_zero(coefficients[site.column]))
            .map(|site| site.label.clone())
            .collect();
        let predicted = model.predict_batch(test.features());
        let score = model.score(test.features(), test.outcomes());

        Self {
            regression_sites,
            score,
            predicted,
        }
    }
}

/// Everything written to a `.model_info.txt` report.
#[derive(Debug)]
pub struct ModelReport<'a> {
    pub name: &'a str,
    pub stats: &'a ModelStats,
    pub test_fraction: f64,
    pub solver_params: &'a [(String, String)],
    pub train: &'a Partition,
    pub test: &'a Partition,
}

impl ModelReport<'_> {
    /// The nine report lines, without trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        let mut params: Vec<&(String, String)> = self.solver_params.iter().collect();
        params.sort_by(|a, b| a.0.cmp(&b.0));
        let split_line = std::iter::once(format!("Test Split:{}", self.test_fraction))
            .chain(params.iter().map(|(k, v)| format!("{k}:{v}")))
            .collect::<Vec<_>>()
            .join("\t");

        vec![
            self.name.to_string(),
            format!("Model Score (R^2) = {}", self.stats.score),
            split_line,
            format!("Test Samples \t{}", join(self.test.labels())),
            format!("Test Samples Predicted Values \t{}", join(&self.stats.predicted)),
            format!("Test Samples Actual Values \t{}", join(self.test.outcomes())),
            format!("Training Samples \t{}", join(self.train.labels())),
            format!("Training Samples Actual Values \t{}", join(self.train.outcomes())),
            format!("Regression Sites \t{}", join(&self.stats.regression_sites)),
        ]
    }

    pub fn render(&self) -> String {
        self.lines().into_iter().map(|line| line + "\n").collect()
    }

    /// Write the report to `path`, replacing any existing file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}

fn join<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("\t")
}
