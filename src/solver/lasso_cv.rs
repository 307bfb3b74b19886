//! Lasso with cross-validated penalty selection.
//!
//! The regression itself is `aprender`'s [`Lasso`]. This module only picks its
//! penalty: every alpha of a decreasing grid is fitted on each fold of an
//! `aprender` [`KFold`] split and scored by held-out mean squared error. The
//! alpha with the lowest mean error across folds wins, and the final model is
//! refitted on all training data with that alpha.
//!
//! `aprender` fits in `f32` and penalizes `½‖y − Xw‖² + α‖w‖₁`, so inputs are
//! narrowed on the way in, the penalty is scaled by the number of fitted
//! samples, and the coefficients come back as `f64`.
//!
//! # Example
//!
//! ```rust
//! use lasso_cv_trainer::solver::{LassoCv, LassoCvParams, Solver};
//! use lasso_cv_trainer::model::InferenceModel;
//! use ndarray::{Array1, Array2};
//!
//! let x = Array2::from_shape_fn((20, 2), |(i, j)| ((i * (j + 2)) % 7) as f64);
//! let y: Array1<f64> = x.column(0).mapv(|v| 2.0 * v + 1.0);
//!
//! let solver = LassoCv::new(LassoCvParams::default().with_cv(4)).unwrap();
//! let model = solver.fit(x.view(), y.view()).unwrap();
//! assert!(model.score(x.view(), y.view()) > 0.99);
//! ```

use std::path::Path;

use aprender::linear_model::Lasso;
use aprender::model_selection::KFold;
use aprender::primitives::{Matrix, Vector};
use aprender::traits::Estimator;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainerError};
use crate::metrics::mean_squared_error;
use crate::model::{
    Fitted, InferenceModel, LinearModel, LinearParams, LinearRegression, SerializableLinearParams,
};
use crate::solver::Solver;

/// Smallest alpha used when the data carries no signal at all.
const ALPHA_RESOLUTION: f64 = 1e-15;

/// Settings of [`LassoCv`].
///
/// Defaults: 100 alphas spanning three decades (`eps = 1e-3`), 5 folds,
/// intercept fitted, 1000 sweeps, `tol = 1e-4`.
///
/// Can be loaded from JSON; missing fields take their defaults:
///
/// ```rust
/// use lasso_cv_trainer::solver::LassoCvParams;
///
/// let params = LassoCvParams::from_json_str(r#"{"cv": 3, "n_alphas": 20}"#).unwrap();
/// assert_eq!(params.cv, 3);
/// assert_eq!(params.max_iter, 1000);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LassoCvParams {
    /// Explicit alpha grid. When `None`, a grid of `n_alphas` values is derived
    /// from the data.
    pub alphas: Option<Vec<f64>>,
    /// Number of cross-validation folds.
    pub cv: usize,
    /// Ratio `alpha_min / alpha_max` of the derived grid.
    pub eps: f64,
    pub fit_intercept: bool,
    /// Maximum number of coordinate-descent sweeps per `aprender` fit.
    pub max_iter: usize,
    /// Number of alphas in the derived grid.
    pub n_alphas: usize,
    /// Convergence tolerance on the largest coefficient change of a sweep.
    pub tol: f64,
}

impl Default for LassoCvParams {
    fn default() -> Self {
        Self {
            alphas: None,
            cv: 5,
            eps: 1e-3,
            fit_intercept: true,
            max_iter: 1000,
            n_alphas: 100,
            tol: 1e-4,
        }
    }
}

impl LassoCvParams {
    pub fn with_alphas(mut self, alphas: Vec<f64>) -> Self {
        self.alphas = Some(alphas);
        self
    }

    pub fn with_cv(mut self, cv: usize) -> Self {
        self.cv = cv;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_n_alphas(mut self, n_alphas: usize) -> Self {
        self.n_alphas = n_alphas;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Check every setting for a usable value.
    pub fn validate(&self) -> Result<()> {
        if self.cv < 2 {
            return Err(invalid(format!("cv must be at least 2, got {}", self.cv)));
        }
        if self.n_alphas == 0 {
            return Err(invalid("n_alphas must be at least 1".to_string()));
        }
        if !(self.eps.is_finite() && self.eps > 0.0) {
            return Err(invalid(format!("eps must be positive, got {}", self.eps)));
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(invalid(format!("tol must be non-negative, got {}", self.tol)));
        }
        if self.max_iter == 0 {
            return Err(invalid("max_iter must be at least 1".to_string()));
        }
        if let Some(alphas) = &self.alphas {
            if alphas.is_empty() {
                return Err(invalid("alphas must not be empty".to_string()));
            }
            if let Some(bad) = alphas.iter().find(|a| !(a.is_finite() && **a >= 0.0)) {
                return Err(invalid(format!(
                    "alphas must be finite and non-negative, got {bad}"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate parameters from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(raw)?;
        params.validate()?;
        Ok(params)
    }

    /// Parse and validate parameters from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Settings as `(name, value)` pairs in name order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let alphas = match &self.alphas {
            Some(alphas) => format!(
                "[{}]",
                alphas
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            None => "None".to_string(),
        };
        vec![
            ("alphas".to_string(), alphas),
            ("cv".to_string(), self.cv.to_string()),
            ("eps".to_string(), self.eps.to_string()),
            ("fit_intercept".to_string(), self.fit_intercept.to_string()),
            ("max_iter".to_string(), self.max_iter.to_string()),
            ("n_alphas".to_string(), self.n_alphas.to_string()),
            ("tol".to_string(), self.tol.to_string()),
        ]
    }
}

fn invalid(msg: String) -> TrainerError {
    TrainerError::InvalidParameter(msg)
}

/// Smallest penalty that zeroes every coefficient, `max_j |x_jᵀ y| / n` on
/// centered data when an intercept is fitted.
pub fn alpha_max(x: ArrayView2<f64>, y: ArrayView1<f64>, fit_intercept: bool) -> f64 {
    let (xc, yc): (Array2<f64>, Array1<f64>) = match (x.mean_axis(Axis(0)), y.mean()) {
        (Some(x_mean), Some(y_mean)) if fit_intercept => (&x - &x_mean, &y - y_mean),
        _ => (x.to_owned(), y.to_owned()),
    };
    let correlations = xc.t().dot(&yc);
    correlations.iter().fold(0.0_f64, |acc, c| acc.max(c.abs())) / x.nrows().max(1) as f64
}

/// Decreasing, log-spaced alpha grid from `alpha_max` down to `eps * alpha_max`.
///
/// If `alpha_max` is numerically zero, every grid entry is [`ALPHA_RESOLUTION`].
pub fn alpha_grid(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    fit_intercept: bool,
    eps: f64,
    n_alphas: usize,
) -> Vec<f64> {
    let alpha_max = alpha_max(x, y, fit_intercept);
    if alpha_max <= ALPHA_RESOLUTION {
        return vec![ALPHA_RESOLUTION; n_alphas];
    }
    if n_alphas == 1 {
        return vec![alpha_max];
    }

    let log_max = alpha_max.log10();
    let log_min = (alpha_max * eps).log10();
    let step = (log_min - log_max) / (n_alphas - 1) as f64;
    (0..n_alphas)
        .map(|i| 10f64.powf(log_max + step * i as f64))
        .collect()
}

/// Row-major `f32` copy of `x` for `aprender`.
fn to_matrix(x: ArrayView2<f64>) -> Result<Matrix<f32>> {
    let data: Vec<f32> = x.iter().map(|&v| v as f32).collect();
    Matrix::from_vec(x.nrows(), x.ncols(), data)
        .map_err(|e| TrainerError::Solver(e.to_string()))
}

fn to_vector(y: ArrayView1<f64>) -> Vector<f32> {
    Vector::from_vec(y.iter().map(|&v| v as f32).collect())
}

/// Lasso regression with the penalty chosen by K-fold cross-validation.
#[derive(Clone, Debug)]
pub struct LassoCv {
    params: LassoCvParams,
}

impl LassoCv {
    /// Create a solver from validated parameters.
    pub fn new(params: LassoCvParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &LassoCvParams {
        &self.params
    }

    fn alphas_for(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Vec<f64> {
        match &self.params.alphas {
            Some(alphas) => {
                let mut sorted = alphas.clone();
                sorted.sort_by(|a, b| b.total_cmp(a));
                sorted
            }
            None => alpha_grid(
                x,
                y,
                self.params.fit_intercept,
                self.params.eps,
                self.params.n_alphas,
            ),
        }
    }

    /// One `aprender` Lasso fit at `alpha` (mean-loss scale).
    fn fit_alpha(&self, x: &Matrix<f32>, y: &Vector<f32>, alpha: f64) -> Result<LinearParams> {
        let (n_samples, _) = x.shape();
        let mut lasso = Lasso::new((alpha * n_samples as f64) as f32)
            .with_intercept(self.params.fit_intercept)
            .with_max_iter(self.params.max_iter)
            .with_tol(self.params.tol as f32);
        lasso
            .fit(x, y)
            .map_err(|e| TrainerError::Solver(e.to_string()))?;

        Ok(LinearParams {
            weights: lasso
                .coefficients()
                .as_slice()
                .iter()
                .map(|&w| f64::from(w))
                .collect(),
            intercept: f64::from(lasso.intercept()),
        })
    }

    fn check_inputs(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(TrainerError::ShapeMismatch {
                expected: format!("{} outcomes", x.nrows()),
                got: y.len().to_string(),
            });
        }
        if x.nrows() == 0 {
            return Err(TrainerError::EmptyData(
                "cannot fit Lasso on zero training samples".to_string(),
            ));
        }
        if x.nrows() < self.params.cv {
            return Err(TrainerError::EmptyData(format!(
                "{} training samples cannot fill {} folds",
                x.nrows(),
                self.params.cv
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(TrainerError::Numerical(
                "training data contains NaN or infinite values".to_string(),
            ));
        }
        Ok(())
    }
}

impl Solver for LassoCv {
    type Model = FittedLasso;

    fn fit(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<FittedLasso> {
        self.check_inputs(x, y)?;

        let alphas = self.alphas_for(x, y);
        let folds = KFold::new(self.params.cv).split(x.nrows());

        let mut mse_sum = vec![0.0; alphas.len()];
        for (fold, (train_idx, test_idx)) in folds.iter().enumerate() {
            let x_train = to_matrix(x.select(Axis(0), train_idx).view())?;
            let y_train = to_vector(y.select(Axis(0), train_idx).view());
            let x_test = x.select(Axis(0), test_idx);
            let y_test = y.select(Axis(0), test_idx);

            for (k, &alpha) in alphas.iter().enumerate() {
                let params = self.fit_alpha(&x_train, &y_train, alpha)?;
                let predicted = LinearRegression::from_params(params).forward(x_test.view());
                mse_sum[k] += mean_squared_error(y_test.view(), predicted.view());
            }
            log::debug!(
                "fold {}/{}: fitted {} alphas on {} samples",
                fold + 1,
                folds.len(),
                alphas.len(),
                train_idx.len()
            );
        }

        let n_folds = folds.len() as f64;
        let mse_path: Vec<f64> = mse_sum.iter().map(|s| s / n_folds).collect();
        let best = mse_path
            .iter()
            .enumerate()
            .fold(0, |best, (k, &mse)| if mse < mse_path[best] { k } else { best });
        let alpha = alphas[best];

        let params = self.fit_alpha(&to_matrix(x)?, &to_vector(y), alpha)?;
        log::info!(
            "selected alpha {} ({} of {}), mean CV MSE {}",
            alpha,
            best + 1,
            alphas.len(),
            mse_path[best]
        );

        Ok(FittedLasso {
            model: LinearRegression::from_params(params).into_fitted(),
            alpha,
            alphas,
            mse_path,
        })
    }

    fn param_pairs(&self) -> Vec<(String, String)> {
        self.params.to_pairs()
    }
}

/// Serializable representation of a [`FittedLasso`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedLassoParams {
    pub linear: SerializableLinearParams,
    pub alpha: f64,
    pub alphas: Vec<f64>,
    pub mse_path: Vec<f64>,
}

/// Linear model fitted by [`LassoCv`], with its cross-validation record.
#[derive(Clone, Debug)]
pub struct FittedLasso {
    model: LinearModel<Fitted>,
    alpha: f64,
    alphas: Vec<f64>,
    mse_path: Vec<f64>,
}

impl FittedLasso {
    /// The alpha selected by cross-validation.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The alpha path that was searched, largest first.
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// Mean held-out MSE for every entry of [`FittedLasso::alphas`].
    pub fn mse_path(&self) -> &[f64] {
        &self.mse_path
    }
}

impl InferenceModel for FittedLasso {
    type ParamsRepr = FittedLassoParams;

    fn predict(&self, input: ArrayView1<f64>) -> f64 {
        self.model.predict(input)
    }

    fn predict_batch(&self, input: ArrayView2<f64>) -> Array1<f64> {
        self.model.predict_batch(input)
    }

    fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.model.coefficients()
    }

    fn intercept(&self) -> f64 {
        self.model.intercept()
    }

    fn extract_params(&self) -> FittedLassoParams {
        FittedLassoParams {
            linear: self.model.extract_params(),
            alpha: self.alpha,
            alphas: self.alphas.clone(),
            mse_path: self.mse_path.clone(),
        }
    }

    fn from_params(params: FittedLassoParams) -> Result<Self> {
        if params.alphas.len() != params.mse_path.len() {
            return Err(TrainerError::ShapeMismatch {
                expected: format!("{} MSE entries", params.alphas.len()),
                got: params.mse_path.len().to_string(),
            });
        }
        Ok(Self {
            model: LinearModel::<Fitted>::from_params(params.linear)?,
            alpha: params.alpha,
            alphas: params.alphas,
            mse_path: params.mse_path,
        })
    }
}
