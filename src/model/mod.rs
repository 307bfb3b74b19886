//! Linear models with compile-time state tracking.
//!
//! A model is either [`Unfitted`] (mutable parameters, used by solvers while
//! fitting) or [`Fitted`] (frozen, implements [`InferenceModel`]). Only fitted
//! models can predict, be scored, or be written to disk.

use std::path::Path;

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::error::Result;
use crate::metrics::r2_score;
use crate::serialization::SerializableParams;

pub mod linear;

pub use linear::{LinearModel, LinearParams, LinearRegression, SerializableLinearParams};

/// A marker type indicating that a model is **not yet trained**.
///
/// Solvers update the parameters of an `Unfitted` model in place; prediction is
/// not available until it is converted with `into_fitted`.
#[derive(Debug, Clone, Copy)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model contains only inference parameters. It implements
/// [`InferenceModel`] and can be serialized.
#[derive(Debug, Clone, Copy)]
pub struct Fitted;

/// Inference-side interface of a fitted regression model.
///
/// This is the whole surface the training pipeline relies on: predictions,
/// the R² score, coefficients aligned with feature columns, and persistence.
pub trait InferenceModel {
    /// Plain-data parameter representation written to model artifacts.
    type ParamsRepr: SerializableParams<Error = bincode::Error>;

    /// Predict on a single sample (feature vector).
    fn predict(&self, input: ArrayView1<f64>) -> f64;

    /// Predict on a batch, one output per row, in row order.
    fn predict_batch(&self, input: ArrayView2<f64>) -> Array1<f64>;

    /// Coefficients, positionally aligned with the feature columns.
    fn coefficients(&self) -> ArrayView1<'_, f64>;

    /// Intercept term.
    fn intercept(&self) -> f64;

    /// Coefficient of determination of the predictions on `x` against `y`.
    fn score(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> f64 {
        let predicted = self.predict_batch(x);
        r2_score(y, predicted.view())
    }

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::ParamsRepr;

    /// Reconstruct a fitted model from parameters.
    fn from_params(params: Self::ParamsRepr) -> Result<Self>
    where
        Self: Sized;

    /// Save the fitted model to a file, overwriting it if present.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.extract_params().to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted model from a file written by [`InferenceModel::save_to_file`].
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::ParamsRepr::from_bytes(&bytes)?;
        Self::from_params(params)
    }
}
