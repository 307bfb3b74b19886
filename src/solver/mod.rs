//! Regression solvers.
//!
//! The training pipeline only talks to the [`Solver`] trait: give it a feature
//! matrix and outcomes, get back a fitted [`InferenceModel`]. [`LassoCv`] is the
//! bundled implementation: it selects the penalty of `aprender`'s Lasso by
//! K-fold cross-validation over a decreasing alpha grid.

use ndarray::{ArrayView1, ArrayView2};

use crate::error::Result;
use crate::model::InferenceModel;

pub mod lasso_cv;

pub use lasso_cv::{alpha_grid, alpha_max, FittedLasso, FittedLassoParams, LassoCv, LassoCvParams};

/// A fitting capability: `fit(X, y) -> model`.
pub trait Solver {
    /// The fitted model produced by this solver.
    type Model: InferenceModel;

    /// Fit a model on `x` (one row per sample) and `y` (one outcome per row).
    fn fit(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<Self::Model>;

    /// Solver settings as `(name, value)` pairs, sorted by name, for reports.
    fn param_pairs(&self) -> Vec<(String, String)>;
}
