//! Linear regression model: `y = w^T x + b`.
//!
//! - [`LinearRegression`] = `LinearModel<Unfitted>`: parameters a solver has
//!   produced but not yet frozen, used to score held-out folds.
//! - `LinearModel<Fitted>`: inference-only, serializable predictor.
//!
//! A fitted model is free from training hyperparameters.

use std::marker::PhantomData;

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainerError};
use crate::model::{Fitted, InferenceModel, Unfitted};

/// Parameters of a linear model: weights and intercept.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearParams {
    pub weights: Array1<f64>,
    pub intercept: f64,
}

/// Serializable representation of linear model parameters.
///
/// Converts the array-backed parameters into plain `Vec<f64>` for storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl From<&LinearParams> for SerializableLinearParams {
    fn from(params: &LinearParams) -> Self {
        Self {
            weights: params.weights.to_vec(),
            intercept: params.intercept,
        }
    }
}

impl TryFrom<SerializableLinearParams> for LinearParams {
    type Error = TrainerError;

    fn try_from(value: SerializableLinearParams) -> Result<Self> {
        if let Some(bad) = value.weights.iter().find(|w| !w.is_finite()) {
            return Err(TrainerError::Numerical(format!(
                "stored weight {bad} is not finite"
            )));
        }
        if !value.intercept.is_finite() {
            return Err(TrainerError::Numerical(format!(
                "stored intercept {} is not finite",
                value.intercept
            )));
        }
        Ok(Self {
            weights: Array1::from_vec(value.weights),
            intercept: value.intercept,
        })
    }
}

/// A linear model with state encoded at the type level.
///
/// - When `S = Unfitted`: parameters can be read and run forward.
/// - When `S = Fitted`: implements [`InferenceModel`].
///
/// This enforces, at compile time, that you cannot call `predict()` on an untrained model.
#[derive(Clone, Debug)]
pub struct LinearModel<S> {
    params: LinearParams,
    _state: PhantomData<S>,
}

/// Alias for an **unfitted** linear regression model.
pub type LinearRegression = LinearModel<Unfitted>;

impl LinearModel<Unfitted> {
    /// Constructs a model from explicit parameters.
    pub fn from_params(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &LinearParams {
        &self.params
    }

    /// Predictions of the current parameters, `X @ w + b`.
    pub fn forward(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.dot(&self.params.weights) + self.params.intercept
    }

    /// Freeze the parameters into an inference model.
    pub fn into_fitted(self) -> LinearModel<Fitted> {
        LinearModel::<Fitted>::new(self.params)
    }
}

impl LinearModel<Fitted> {
    /// Creates a new fitted linear model from trained parameters.
    pub fn new(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

impl InferenceModel for LinearModel<Fitted> {
    type ParamsRepr = SerializableLinearParams;

    fn predict(&self, input: ArrayView1<f64>) -> f64 {
        self.params.weights.dot(&input) + self.params.intercept
    }

    fn predict_batch(&self, input: ArrayView2<f64>) -> Array1<f64> {
        input.dot(&self.params.weights) + self.params.intercept
    }

    fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.params.weights.view()
    }

    fn intercept(&self) -> f64 {
        self.params.intercept
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self> {
        Ok(Self::new(LinearParams::try_from(params)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fitted(weights: Array1<f64>, intercept: f64) -> LinearModel<Fitted> {
        LinearModel::<Fitted>::new(LinearParams { weights, intercept })
    }

    #[test]
    fn test_linear_regression_from_params() {
        let model = LinearRegression::from_params(LinearParams {
            weights: array![1.0, 2.0],
            intercept: 0.5,
        });

        assert_eq!(model.params().weights.to_vec(), vec![1.0, 2.0]);
        assert_eq!(model.params().intercept, 0.5);
    }

    #[test]
    fn test_linear_regression_forward_correctness() {
        let model = LinearRegression::from_params(LinearParams {
            weights: array![2.0, 3.0],
            intercept: 1.0,
        });

        // [[1, 0], [0, 1]] -> [2 + 1, 3 + 1]
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        assert_eq!(model.forward(x.view()).to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_into_fitted_keeps_params() {
        let model = LinearRegression::from_params(LinearParams {
            weights: array![1.0],
            intercept: 0.5,
        });

        let fitted = model.into_fitted();

        assert_eq!(fitted.coefficients().to_vec(), vec![1.0]);
        assert_eq!(fitted.intercept(), 0.5);
    }

    #[test]
    fn test_predict_single_sample() {
        let model = fitted(array![2.0, 3.0], 1.0);
        // 2*1 + 3*2 + 1
        assert_eq!(model.predict(array![1.0, 2.0].view()), 9.0);
    }

    #[test]
    fn test_predict_batch_preserves_row_order() {
        let model = fitted(array![1.0, 2.0], 3.0);
        let batch = array![[2.0, 2.0], [1.0, 1.0], [0.0, 0.0]];

        assert_eq!(model.predict_batch(batch.view()).to_vec(), vec![9.0, 6.0, 3.0]);
    }

    #[test]
    fn test_predict_batch_empty() {
        let model = fitted(array![1.0, 2.0], 3.0);
        let batch = ndarray::Array2::<f64>::zeros((0, 2));

        assert!(model.predict_batch(batch.view()).is_empty());
    }

    #[test]
    fn test_score_exact_fit_is_one() {
        let model = fitted(array![2.0], 1.0);
        let x = array![[0.0], [1.0], [2.0]];
        let y = array![1.0, 3.0, 5.0];

        assert!((model.score(x.view(), y.view()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_params_rejects_non_finite() {
        let serial = SerializableLinearParams {
            weights: vec![1.0, f64::NAN],
            intercept: 0.0,
        };

        let result = LinearModel::<Fitted>::from_params(serial);
        assert!(matches!(result, Err(TrainerError::Numerical(_))));
    }

    #[test]
    fn test_linear_model_save_load() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let model = fitted(array![1.0, -2.5, 0.0], 0.25);

        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("linear.model");
        model.save_to_file(&path)?;

        let loaded = LinearModel::<Fitted>::load_from_file(&path)?;

        assert_eq!(model.extract_params(), loaded.extract_params());
        Ok(())
    }
}
