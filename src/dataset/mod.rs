//! Labeled sample containers.
//!
//! - [`SampleSet`]: the validated input: one feature row, one outcome and one
//!   label per sample, aligned by position.
//! - [`Partition`]: a Train or Test subset built from a [`SampleSet`], with the
//!   same alignment guarantee.
//!
//! # Example
//!
//! ```rust
//! use lasso_cv_trainer::dataset::SampleSet;
//!
//! let samples = SampleSet::from_rows(
//!     vec![vec![1.0, 0.5], vec![2.0, 1.5], vec![3.0, 2.5]],
//!     vec![10.0, 20.0, 30.0],
//!     vec!["a".into(), "b".into(), "c".into()],
//! )
//! .unwrap();
//!
//! let test = samples.select(&[2]);
//! assert_eq!(test.labels(), &["c".to_string()]);
//! assert_eq!(test.outcomes().to_vec(), vec![30.0]);
//! ```

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{Result, TrainerError};

/// Feature matrix, outcomes and sample labels, aligned by row.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSet {
    features: Array2<f64>,
    outcomes: Array1<f64>,
    labels: Vec<String>,
}

impl SampleSet {
    /// Creates a sample set, checking that every sample has a feature row,
    /// an outcome and a label.
    ///
    /// # Errors
    ///
    /// - [`TrainerError::ShapeMismatch`] if the three inputs disagree on the
    ///   number of samples
    /// - [`TrainerError::EmptyData`] if there are no samples
    pub fn new(features: Array2<f64>, outcomes: Array1<f64>, labels: Vec<String>) -> Result<Self> {
        let n = features.nrows();
        if outcomes.len() != n {
            return Err(TrainerError::ShapeMismatch {
                expected: format!("{n} outcomes"),
                got: outcomes.len().to_string(),
            });
        }
        if labels.len() != n {
            return Err(TrainerError::ShapeMismatch {
                expected: format!("{n} sample labels"),
                got: labels.len().to_string(),
            });
        }
        if n == 0 {
            return Err(TrainerError::EmptyData("sample set has no rows".to_string()));
        }
        Ok(Self {
            features,
            outcomes,
            labels,
        })
    }

    /// Creates a sample set from row vectors.
    ///
    /// All rows must have the same number of features.
    pub fn from_rows(rows: Vec<Vec<f64>>, outcomes: Vec<f64>, labels: Vec<String>) -> Result<Self> {
        let n_features = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|row| row.len() != n_features) {
            return Err(TrainerError::FeatureMismatch {
                expected_features: n_features,
                got_features: bad.len(),
            });
        }
        let n_rows = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let features = Array2::from_shape_vec((n_rows, n_features), flat).map_err(|e| {
            TrainerError::ShapeMismatch {
                expected: format!("{n_rows}x{n_features} feature matrix"),
                got: e.to_string(),
            }
        })?;
        Self::new(features, Array1::from_vec(outcomes), labels)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always `false` for a constructed set; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn outcomes(&self) -> ArrayView1<'_, f64> {
        self.outcomes.view()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Copies the samples at `indices`, in the given order, into a [`Partition`].
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Partition {
        Partition {
            features: self.features.select(Axis(0), indices),
            outcomes: self.outcomes.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i].clone()).collect(),
        }
    }
}

/// One side of a train/test split.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    features: Array2<f64>,
    outcomes: Array1<f64>,
    labels: Vec<String>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn outcomes(&self) -> ArrayView1<'_, f64> {
        self.outcomes.view()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
